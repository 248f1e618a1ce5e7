//! Camera framing.
//!
//! Pure placement math over the scene box; the host's controls own the
//! camera between moves. Preset moves are tweened through the scheduler by
//! the viewer controller.

use glam::Vec3;

use crate::resources::geometry::BoundingBox;

/// Margin applied on top of the exact fit distance.
const FIT_MARGIN: f32 = 1.35;

/// Canned viewpoints relative to the scene box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    Front,
    Side,
    Top,
}

/// A camera placement: eye position plus look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    pub position: Vec3,
    pub target: Vec3,
}

/// Places the camera so the whole box fits the given vertical field of
/// view, looking slightly above the box center.
#[must_use]
pub fn fit_to_bbox(bbox: &BoundingBox, fov_degrees: f32) -> CameraFraming {
    let size = bbox.size();
    let center = bbox.center();
    let max_dim = size.x.max(size.y).max(size.z);
    let fov = fov_degrees.to_radians();
    let distance = (max_dim / (2.0 * (fov / 2.0).tan())).abs() * FIT_MARGIN;

    CameraFraming {
        position: center + Vec3::new(distance * 0.8, distance * 0.5, distance),
        target: center + Vec3::new(0.0, size.y * 0.1, 0.0),
    }
}

/// Eye position for a canned viewpoint.
#[must_use]
pub fn preset_position(bbox: &BoundingBox, preset: ViewPreset) -> Vec3 {
    let size = bbox.size();
    let center = bbox.center();
    match preset {
        ViewPreset::Front => center + Vec3::new(size.x * 0.9, size.y * 0.45, size.z * 0.05),
        ViewPreset::Side => center + Vec3::new(size.x * 0.05, size.y * 0.4, size.z * 1.1),
        ViewPreset::Top => center + Vec3::new(size.x * 0.05, size.y * 1.6, size.z * 0.1),
    }
}
