//! Geometry query helpers.
//!
//! Pure functions over world-space data. Callers must refresh world
//! matrices before calling when any ancestor transform changed in the same
//! operation.

use glam::Vec3;

use crate::resources::geometry::BoundingBox;
use crate::scene::{NodeHandle, Scene};

/// World-space bounding-box center of a node's subtree, falling back to the
/// node's world origin when the subtree has no usable geometry (a point
/// sample instead of a degenerate volumetric one).
#[must_use]
pub fn world_center(scene: &Scene, node: NodeHandle) -> Option<Vec3> {
    match scene.compute_world_bbox(node) {
        Some(bbox) if bbox.is_valid() => Some(bbox.center()),
        _ => scene.world_position(node),
    }
}

/// True when `point` lies in the bottom `fraction` of the scene's height.
#[must_use]
pub fn is_near_ground(point: Vec3, scene_bbox: &BoundingBox, fraction: f32) -> bool {
    point.y < scene_bbox.min.y + scene_bbox.size().y * fraction
}

/// Euclidean distance in the ground plane (X, Z) only.
#[must_use]
pub fn horizontal_distance(point: Vec3, center: Vec3) -> f32 {
    let dx = point.x - center.x;
    let dz = point.z - center.z;
    (dx * dx + dz * dz).sqrt()
}
