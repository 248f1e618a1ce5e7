//! Quadrant wheel grouping.
//!
//! Wheel candidates (a mix of mesh leaves and pre-grouped containers) are
//! clustered into up to four independently-movable containers, one per
//! occupied horizontal-plane quadrant relative to the scene center. Members
//! are reparented with world-transform-preserving attach so the regrouping
//! is visually invisible.

use glam::Vec3;

use crate::scene::{NodeHandle, Scene};
use crate::viewer::spatial;

/// Horizontal-plane quadrant relative to the scene center
/// (left/right × front/back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    LeftBack,
    LeftFront,
    RightBack,
    RightFront,
}

impl Quadrant {
    /// Quadrant of a world point `p` relative to `center`. Points exactly
    /// on a boundary go to the right/front side.
    #[must_use]
    pub fn of_point(p: Vec3, center: Vec3) -> Self {
        match (p.x >= center.x, p.z >= center.z) {
            (false, false) => Quadrant::LeftBack,
            (false, true) => Quadrant::LeftFront,
            (true, false) => Quadrant::RightBack,
            (true, true) => Quadrant::RightFront,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::LeftBack => "LB",
            Quadrant::LeftFront => "LF",
            Quadrant::RightBack => "RB",
            Quadrant::RightFront => "RF",
        }
    }

    const ALL: [Quadrant; 4] = [
        Quadrant::LeftBack,
        Quadrant::LeftFront,
        Quadrant::RightBack,
        Quadrant::RightFront,
    ];
}

/// One wheel cluster: a freshly created container node plus the position it
/// had at creation time.
///
/// `rest_position` is captured once and never mutated afterwards; it is the
/// canonical "assembled" target for the explode controller and for reset.
#[derive(Debug, Clone)]
pub struct WheelGroup {
    pub node: NodeHandle,
    pub quadrant: Quadrant,
    pub rest_position: Vec3,
}

/// Representative world point of a candidate: mesh leaves use their world
/// origin, containers their aggregate box center (falling back to the world
/// origin when the box is degenerate).
fn representative_point(scene: &Scene, candidate: NodeHandle) -> Option<Vec3> {
    let node = scene.get_node(candidate)?;
    if node.is_mesh() {
        scene.world_position(candidate)
    } else {
        spatial::world_center(scene, candidate)
    }
}

/// Groups wheel candidates by spatial quadrant.
///
/// For each occupied quadrant a new container node is inserted at the scene
/// root, positioned at the centroid of its members' representative points,
/// and every member is reparented into it with world transform preserved.
/// Container candidates are flattened: their mesh-bearing descendants are
/// attached directly, never the original container itself. A failed
/// world-preserving attach falls back to a plain attach for that member
/// only.
///
/// Occupied quadrants only — a two-wheeled asset yields two groups. World
/// matrices must be current before calling.
pub fn group_by_quadrant(
    scene: &mut Scene,
    candidates: &[NodeHandle],
    center: Vec3,
) -> Vec<WheelGroup> {
    // Fixed-order buckets keep group creation deterministic.
    let mut buckets: [Vec<(NodeHandle, Vec3)>; 4] = Default::default();

    for &candidate in candidates {
        let Some(p) = representative_point(scene, candidate) else {
            log::warn!("Wheel candidate without a usable position; skipping");
            continue;
        };
        let quadrant = Quadrant::of_point(p, center);
        buckets[quadrant as usize].push((candidate, p));
    }

    let mut groups = Vec::new();

    for quadrant in Quadrant::ALL {
        let members = std::mem::take(&mut buckets[quadrant as usize]);
        if members.is_empty() {
            continue;
        }

        let centroid =
            members.iter().map(|(_, p)| *p).sum::<Vec3>() / members.len() as f32;

        let group = scene.create_node_with_name(&format!("WheelGroup_{}", quadrant.label()));
        if let Some(node) = scene.get_node_mut(group) {
            node.transform.position = centroid;
        }
        // The group must have a current world matrix before members are
        // re-expressed in its frame.
        scene.update_subtree(group);

        for (member, _) in &members {
            let member = *member;
            let is_mesh = scene.get_node(member).is_some_and(crate::scene::Node::is_mesh);
            if is_mesh {
                attach_member(scene, member, group);
            } else {
                // Flatten pre-grouped containers: move only their
                // mesh-bearing descendants, avoiding double-nesting.
                for handle in scene.collect_subtree(member) {
                    if handle != member
                        && scene.get_node(handle).is_some_and(crate::scene::Node::is_mesh)
                    {
                        attach_member(scene, handle, group);
                    }
                }
            }
        }

        groups.push(WheelGroup {
            node: group,
            quadrant,
            rest_position: centroid,
        });
    }

    log::debug!("Grouped {} candidates into {} wheel groups", candidates.len(), groups.len());

    groups
}

/// One bad element must not block the rest: fall back to a plain attach
/// (which may visibly jump) when the world-preserving attach fails.
fn attach_member(scene: &mut Scene, member: NodeHandle, group: NodeHandle) {
    if !scene.attach_keeping_world(member, group) {
        log::warn!("World-preserving attach failed; falling back to plain attach");
        scene.attach(member, group);
    }
}
