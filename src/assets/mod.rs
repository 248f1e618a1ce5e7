//! Asset loading.
//!
//! Only hierarchy and material metadata are decoded: node names and
//! transforms, per-primitive bounding boxes, and the material factors the
//! classifier needs. Vertex buffers and images are the renderer's concern
//! and never leave the file.

pub mod gltf;

pub use gltf::GltfLoader;
