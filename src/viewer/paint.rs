//! Paint and finish application.
//!
//! Thin consumer of the classifier's `body_parts` set: assigns a shared
//! physical paint material and adjusts its color/finish parameters. Glass
//! and wheels are never repainted.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::resources::material::{Material, MaterialData, PhysicalMaterial};
use crate::scene::{MaterialKey, NodeHandle, Scene};

pub const DEFAULT_BODY_COLOR: Vec3 = Vec3::ONE;

/// Body finish presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    #[default]
    Gloss,
    Satin,
    Matte,
}

/// Shading parameters of a finish preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishParams {
    pub metalness: f32,
    pub roughness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
}

impl Finish {
    #[must_use]
    pub fn params(self) -> FinishParams {
        match self {
            Finish::Gloss => FinishParams {
                metalness: 0.85,
                roughness: 0.25,
                clearcoat: 1.0,
                clearcoat_roughness: 0.06,
            },
            Finish::Satin => FinishParams {
                metalness: 0.6,
                roughness: 0.45,
                clearcoat: 0.6,
                clearcoat_roughness: 0.25,
            },
            Finish::Matte => FinishParams {
                metalness: 0.2,
                roughness: 0.8,
                clearcoat: 0.0,
                clearcoat_roughness: 0.0,
            },
        }
    }
}

/// Builds the default showroom paint: white gloss clearcoat.
#[must_use]
pub fn default_paint() -> Material {
    let params = Finish::Gloss.params();
    let mut paint = PhysicalMaterial::new(Vec4::new(1.0, 1.0, 1.0, 1.0));
    paint.metalness = params.metalness;
    paint.roughness = params.roughness;
    paint.clearcoat = params.clearcoat;
    paint.clearcoat_roughness = params.clearcoat_roughness;
    Material::from(paint).with_name("showroom_paint")
}

/// Replaces every material slot of every body mesh with one shared paint
/// material. Returns its key.
pub fn apply_default_paint(scene: &mut Scene, body_parts: &[NodeHandle]) -> MaterialKey {
    let key = scene.add_material(default_paint());
    for &handle in body_parts {
        let Some(mesh_key) = scene.get_node(handle).and_then(|n| n.mesh) else {
            continue;
        };
        if let Some(mesh) = scene.meshes.get_mut(mesh_key) {
            for slot in &mut mesh.materials {
                *slot = key;
            }
        }
    }
    key
}

/// Recolors body materials. Only physically-shaded materials take paint;
/// unlit or unknown materials on a body mesh are left alone.
pub fn set_body_color(scene: &mut Scene, body_parts: &[NodeHandle], color: Vec3) {
    for_each_body_material(scene, body_parts, |material| {
        if let MaterialData::Physical(m) = &mut material.data {
            m.color = Vec4::new(color.x, color.y, color.z, m.color.w);
        }
    });
}

/// Applies a finish preset to body materials.
pub fn set_finish(scene: &mut Scene, body_parts: &[NodeHandle], finish: Finish) {
    let params = finish.params();
    for_each_body_material(scene, body_parts, |material| {
        if let MaterialData::Physical(m) = &mut material.data {
            m.metalness = params.metalness;
            m.roughness = params.roughness;
            m.clearcoat = params.clearcoat;
            m.clearcoat_roughness = params.clearcoat_roughness;
        }
    });
}

/// Maps material parameters back onto the nearest finish preset, used when
/// persisting the current configuration.
#[must_use]
pub fn infer_finish(material: &Material) -> Finish {
    let Some(m) = material.as_physical() else {
        return Finish::Gloss;
    };
    if m.clearcoat > 0.8 && m.roughness < 0.35 {
        Finish::Gloss
    } else if m.clearcoat > 0.3 && m.roughness < 0.6 {
        Finish::Satin
    } else {
        Finish::Matte
    }
}

fn for_each_body_material(
    scene: &mut Scene,
    body_parts: &[NodeHandle],
    mut f: impl FnMut(&mut Material),
) {
    // Materials are shared; visit each key once.
    let mut seen = Vec::new();
    for &handle in body_parts {
        for key in scene.node_material_keys(handle) {
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            if let Some(material) = scene.get_material_mut(key) {
                f(material);
            }
        }
    }
}
