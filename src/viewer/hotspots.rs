//! Hotspot anchor points.
//!
//! World-space anchors for the host's UI markers, derived from the scene
//! box. Screen projection is the renderer's job.

use glam::Vec3;

use crate::resources::geometry::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotspotAnchors {
    /// Upper body panel.
    pub body: Vec3,
    /// Front-right wheel arch.
    pub wheel: Vec3,
}

#[must_use]
pub fn anchors(bbox: &BoundingBox) -> HotspotAnchors {
    let center = bbox.center();
    let size = bbox.size();
    HotspotAnchors {
        body: Vec3::new(center.x + size.x * 0.2, center.y + size.y * 0.8, center.z),
        wheel: Vec3::new(bbox.max.x, bbox.min.y + size.y * 0.4, bbox.max.z),
    }
}
