//! Error Types
//!
//! This module defines the error types used throughout the viewer core.
//!
//! All public APIs that can fail return [`Result<T>`], an alias for
//! `std::result::Result<T, ShowroomError>`. Per-node failures inside
//! classification and grouping are not errors: those paths degrade by
//! skipping the offending node.

use thiserror::Error;

/// The main error type for the showroom viewer core.
#[derive(Error, Debug)]
pub enum ShowroomError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset could not be found on disk.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// The asset parsed but contains no scene to instantiate.
    #[error("Asset contains no scene: {0}")]
    EmptyAsset(String),

    // ========================================================================
    // I/O & Serialization Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error (viewer configuration).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<gltf::Error> for ShowroomError {
    fn from(err: gltf::Error) -> Self {
        ShowroomError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, ShowroomError>`.
pub type Result<T> = std::result::Result<T, ShowroomError>;
