//! Explode/implode state machine.
//!
//! A two-state toggle (assembled / exploded). Each transition retargets
//! every wheel group's position tween: outward along its ground-plane
//! direction from the scene center when exploding, back to the recorded
//! rest position when assembling. Toggling twice lands on bit-identical
//! rest positions because the assembled target is the stored vector itself,
//! not an offset of zero applied to the current position.

use glam::Vec3;

use crate::animation::TweenScheduler;
use crate::scene::{NodeHandle, Scene};
use crate::viewer::wheels::WheelGroup;

/// Fraction of the scene bounding diagonal each group travels outward.
pub const DISTANCE_FACTOR: f32 = 0.18;
/// Base tween duration in seconds.
pub const BASE_DURATION: f32 = 0.6;
/// Per-group duration increment so groups do not move in perfect lockstep.
pub const STAGGER: f32 = 0.03;

/// Two-state explode controller; starts assembled.
#[derive(Debug, Default)]
pub struct ExplodeController {
    exploded: bool,
}

impl ExplodeController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    /// Toggles between assembled and exploded.
    ///
    /// Returns `false` without mutating any state when there are no wheel
    /// groups (the caller surfaces a notice). Otherwise flips the state,
    /// recomputes the scene box from current transforms, and schedules one
    /// staggered tween per group.
    pub fn toggle(
        &mut self,
        scene: &mut Scene,
        root: NodeHandle,
        groups: &[WheelGroup],
        scheduler: &mut TweenScheduler,
        now: f64,
    ) -> bool {
        if groups.is_empty() {
            return false;
        }

        self.exploded = !self.exploded;
        let factor = if self.exploded { 1.0 } else { 0.0 };

        // The box must reflect up-to-date transforms; a previous toggle may
        // still be mid-flight.
        scene.update_matrix_world();
        let (center, diagonal) = match scene.compute_world_bbox(root) {
            Some(bbox) if bbox.is_valid() => (bbox.center(), bbox.diagonal()),
            _ => (Vec3::ZERO, 1.0),
        };
        let distance = diagonal * DISTANCE_FACTOR * factor;

        for (i, group) in groups.iter().enumerate() {
            let Some(world_pos) = scene.world_position(group.node) else {
                continue;
            };

            let dir = outward_direction(world_pos, center);
            let end = group.rest_position + dir * distance;
            let duration = BASE_DURATION + STAGGER * i as f32;
            scheduler.start(group_task_name(i), scene, group.node, end, duration, now);
        }

        true
    }

    /// Forces the assembled state, always tweening every group back to its
    /// rest position regardless of the current toggle. Used by reset to
    /// correct any drift.
    pub fn settle(
        &mut self,
        scene: &Scene,
        groups: &[WheelGroup],
        scheduler: &mut TweenScheduler,
        now: f64,
    ) {
        for (i, group) in groups.iter().enumerate() {
            let duration = BASE_DURATION + STAGGER * i as f32;
            scheduler.start(
                group_task_name(i),
                scene,
                group.node,
                group.rest_position,
                duration,
                now,
            );
        }
        self.exploded = false;
    }

    /// Clears the flag without animating (asset teardown).
    pub fn reset_state(&mut self) {
        self.exploded = false;
    }
}

fn group_task_name(index: usize) -> String {
    format!("wheel_group_{index}")
}

/// Normalized outward direction in the ground plane. Degenerate vectors
/// (group sitting at the scene center) substitute the sign of the X/Z
/// offset, defaulting to +1 on exact zero.
fn outward_direction(world_pos: Vec3, center: Vec3) -> Vec3 {
    let mut dir = world_pos - center;
    dir.y = 0.0;
    if dir.length_squared() < 1e-6 {
        let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
        dir = Vec3::new(sign(world_pos.x - center.x), 0.0, sign(world_pos.z - center.z));
    }
    dir.normalize()
}
