//! Viewer configuration persistence.
//!
//! The user's color/finish/autorotate choices serialize to a small JSON
//! file at a host-supplied path.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::viewer::paint::Finish;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Body paint color, linear RGB.
    pub color: [f32; 3],
    pub finish: Finish,
    pub autorotate: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            finish: Finish::Gloss,
            autorotate: true,
        }
    }
}

impl ViewerConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
