//! Automatic part classification.
//!
//! A single traversal in two passes plus a body pass splits an
//! externally-authored vehicle asset into three disjoint sets: paintable
//! body meshes, glass meshes, and wheel candidates. No authoring metadata
//! is assumed; the heuristic is keyword matching plus scale-relative
//! position thresholds, and it degrades by skipping nodes it cannot read.

use rustc_hash::FxHashSet;

use crate::resources::geometry::BoundingBox;
use crate::resources::material::Material;
use crate::scene::{NodeHandle, Scene};
use crate::viewer::spatial;

const GLASS_KEYWORDS: &[&str] = &["glass", "windshield", "window", "windscreen", "wind_screen"];
const WHEEL_KEYWORDS: &[&str] = &["wheel", "tire", "tyre", "rim", "hubcap"];

/// Tunable classification thresholds.
///
/// All fractions are relative to the whole scene's bounding box, so the
/// heuristic is resolution-independent across differently sized assets.
/// The defaults are empirical and do not generalize to every silhouette
/// (very low sports cars or very tall trucks may misclassify).
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Ground fraction for the container pre-screen (stricter).
    pub container_ground_fraction: f32,
    /// Ground fraction for per-mesh position tests (looser).
    pub mesh_ground_fraction: f32,
    /// Horizontal distance threshold as a fraction of max(width, depth).
    pub horizontal_fraction: f32,
    /// Materials below this opacity count as glass.
    pub opacity_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            container_ground_fraction: 0.45,
            mesh_ground_fraction: 0.40,
            horizontal_fraction: 0.20,
            opacity_threshold: 0.98,
        }
    }
}

/// Classifier output: three mutually exclusive sets of node handles.
///
/// `wheel_candidates` is transient — the quadrant grouper consumes it and
/// replaces the candidates with wheel-group containers. The sets are not
/// necessarily exhaustive: unreadable nodes are skipped entirely.
#[derive(Debug, Default)]
pub struct Classification {
    pub body_parts: Vec<NodeHandle>,
    pub glass_parts: Vec<NodeHandle>,
    pub wheel_candidates: Vec<NodeHandle>,
}

fn name_matches(name: &str, keywords: &[&str]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn material_is_transparent(scene: &Scene, node: NodeHandle, threshold: f32) -> bool {
    scene
        .node_material_keys(node)
        .iter()
        .filter_map(|&key| scene.get_material(key))
        .any(|m| m.is_transparent(threshold))
}

fn material_supports_pbr(scene: &Scene, node: NodeHandle) -> bool {
    scene
        .node_material_keys(node)
        .iter()
        .filter_map(|&key| scene.get_material(key))
        .any(Material::supports_pbr)
}

/// Classifies every mesh under `root` given the whole-scene box.
///
/// Never panics: nodes with missing meshes, materials, or degenerate boxes
/// simply fall through the tests they cannot answer. World matrices must be
/// current before calling.
#[must_use]
pub fn classify(
    scene: &Scene,
    root: NodeHandle,
    scene_bbox: &BoundingBox,
    config: &ClassifierConfig,
) -> Classification {
    let mut out = Classification::default();

    if scene_bbox.is_empty() {
        log::warn!("Empty scene bounds; skipping classification");
        return out;
    }

    let center = scene_bbox.center();
    let size = scene_bbox.size();
    let horizontal_threshold = size.x.max(size.z) * config.horizontal_fraction;

    let subtree = scene.collect_subtree(root);
    let mut visited: FxHashSet<NodeHandle> = FxHashSet::default();

    // Pass 1 — container pre-screen: authors often group a wheel's meshes
    // under one container. A container whose aggregate box sits low and
    // off-center becomes a candidate wholesale; its descendants are not
    // re-evaluated.
    for &handle in &subtree {
        if handle == root || visited.contains(&handle) {
            continue;
        }
        let Some(node) = scene.get_node(handle) else {
            continue;
        };
        if node.is_mesh() || !scene.has_mesh_descendant(handle) {
            continue;
        }
        let Some(bbox) = scene.compute_world_bbox(handle) else {
            continue;
        };
        if !bbox.is_valid() {
            continue;
        }
        let p = bbox.center();
        let near_ground = spatial::is_near_ground(p, scene_bbox, config.container_ground_fraction);
        let far_enough = spatial::horizontal_distance(p, center) > horizontal_threshold;
        if near_ground && far_enough {
            out.wheel_candidates.push(handle);
            visited.extend(scene.collect_subtree(handle));
        }
    }

    // Pass 2 — per-mesh classification, skipping visited nodes.
    for &handle in &subtree {
        if visited.contains(&handle) {
            continue;
        }
        let Some(node) = scene.get_node(handle) else {
            continue;
        };
        if !node.is_mesh() {
            continue;
        }

        // Glass wins over everything else.
        if name_matches(&node.name, GLASS_KEYWORDS)
            || material_is_transparent(scene, handle, config.opacity_threshold)
        {
            out.glass_parts.push(handle);
            visited.insert(handle);
            continue;
        }

        if name_matches(&node.name, WHEEL_KEYWORDS) {
            out.wheel_candidates.push(handle);
            visited.insert(handle);
            continue;
        }

        // Position heuristic: low and far enough from the horizontal center.
        let Some(pos) = scene.world_position(handle) else {
            continue;
        };
        let near_ground = spatial::is_near_ground(pos, scene_bbox, config.mesh_ground_fraction);
        let far_enough = spatial::horizontal_distance(pos, center) > horizontal_threshold;
        if near_ground && far_enough {
            out.wheel_candidates.push(handle);
            visited.insert(handle);
        }
    }

    // Pass 3 — body assignment: whatever is neither glass nor wheel and can
    // actually be repainted (physically-shaded materials only).
    for &handle in &subtree {
        if visited.contains(&handle) {
            continue;
        }
        let Some(node) = scene.get_node(handle) else {
            continue;
        };
        if !node.is_mesh() {
            continue;
        }
        if material_supports_pbr(scene, handle) {
            out.body_parts.push(handle);
        }
    }

    // Fallback: a model with no PBR materials must still be paintable, so
    // every non-glass mesh becomes body — wheels included.
    if out.body_parts.is_empty() {
        for &handle in &subtree {
            let Some(node) = scene.get_node(handle) else {
                continue;
            };
            if node.is_mesh() && !out.glass_parts.contains(&handle) {
                out.body_parts.push(handle);
            }
        }
    }

    log::debug!(
        "Classified: {} body, {} glass, {} wheel candidates",
        out.body_parts.len(),
        out.glass_parts.len(),
        out.wheel_candidates.len(),
    );

    out
}
