use std::path::Path;

use glam::{Quat, Vec3, Vec4};
use rustc_hash::FxHashMap;

use crate::errors::{Result, ShowroomError};
use crate::resources::geometry::{BoundingBox, Geometry};
use crate::resources::material::{Material, MaterialData, PhysicalMaterial, UnlitMaterial};
use crate::resources::mesh::Mesh;
use crate::scene::{MaterialKey, NodeHandle, Scene};

/// Loads a glTF/GLB asset into a [`Scene`] subtree.
pub struct GltfLoader;

impl GltfLoader {
    /// Parses `path` and instantiates its default scene (or the first scene
    /// when none is marked default) under a fresh root node at the scene
    /// root. Returns the root handle.
    pub fn load(path: impl AsRef<Path>, scene: &mut Scene) -> Result<NodeHandle> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ShowroomError::AssetNotFound(path.display().to_string()));
        }

        let gltf = gltf::Gltf::open(path)?;
        let document = gltf.document;

        let source_scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| ShowroomError::EmptyAsset(path.display().to_string()))?;

        // Convert materials up front; primitives reference them by index.
        let mut materials: FxHashMap<usize, MaterialKey> = FxHashMap::default();
        for material in document.materials() {
            if let Some(index) = material.index() {
                materials.insert(index, scene.add_material(convert_material(&material)));
            }
        }

        let root_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("asset");
        let root = scene.create_node_with_name(root_name);

        let mut builder = NodeBuilder {
            scene,
            materials,
            default_material: None,
            node_count: 0,
            mesh_count: 0,
        };
        for node in source_scene.nodes() {
            builder.build(&node, root);
        }

        log::info!(
            "Loaded {}: {} nodes, {} meshes, {} materials",
            path.display(),
            builder.node_count,
            builder.mesh_count,
            document.materials().len(),
        );

        Ok(root)
    }
}

struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    materials: FxHashMap<usize, MaterialKey>,
    /// Key for primitives without a material, created on first use.
    default_material: Option<MaterialKey>,
    node_count: usize,
    mesh_count: usize,
}

impl NodeBuilder<'_> {
    fn build(&mut self, gltf_node: &gltf::Node<'_>, parent: NodeHandle) {
        let mut node = crate::scene::Node::new_named(gltf_node.name().unwrap_or(""));

        let (translation, rotation, scale) = gltf_node.transform().decomposed();
        node.transform.position = Vec3::from_array(translation);
        node.transform.rotation = Quat::from_array(rotation);
        node.transform.scale = Vec3::from_array(scale);

        if let Some(gltf_mesh) = gltf_node.mesh() {
            let mesh = self.convert_mesh(&gltf_mesh, gltf_node.name().unwrap_or(""));
            node.mesh = Some(self.scene.meshes.insert(mesh));
            self.mesh_count += 1;
        }

        let handle = self.scene.add_to_parent(node, parent);
        self.node_count += 1;

        for child in gltf_node.children() {
            self.build(&child, handle);
        }
    }

    fn convert_mesh(&mut self, gltf_mesh: &gltf::Mesh<'_>, node_name: &str) -> Mesh {
        let mut bounds = BoundingBox::EMPTY;
        let mut vertex_count = 0u32;
        let mut material_keys = Vec::new();

        for primitive in gltf_mesh.primitives() {
            let b = primitive.bounding_box();
            bounds.expand(Vec3::from_array(b.min));
            bounds.expand(Vec3::from_array(b.max));

            if let Some(accessor) = primitive.get(&gltf::Semantic::Positions) {
                vertex_count += accessor.count() as u32;
            }

            let key = match primitive.material().index() {
                Some(index) => self.materials.get(&index).copied(),
                None => None,
            };
            material_keys.push(key.unwrap_or_else(|| self.default_material_key()));
        }

        let name = gltf_mesh.name().unwrap_or(node_name);
        Mesh::new(name, Geometry::new(bounds, vertex_count), material_keys)
    }

    fn default_material_key(&mut self) -> MaterialKey {
        if let Some(key) = self.default_material {
            return key;
        }
        let key = self
            .scene
            .add_material(Material::new_physical(Vec4::ONE).with_name("default"));
        self.default_material = Some(key);
        key
    }
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let base_color = Vec4::from_array(pbr.base_color_factor());
    let opacity = base_color.w;

    let data = if material.unlit() {
        MaterialData::Unlit(UnlitMaterial {
            color: base_color,
            opacity,
        })
    } else {
        let emissive = Vec3::from_array(material.emissive_factor());
        MaterialData::Physical(PhysicalMaterial {
            color: base_color,
            metalness: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            emissive,
            emissive_intensity: 1.0,
            opacity,
        })
    };

    let mut out = Material::new(data).with_name(material.name().unwrap_or(""));
    out.settings.transparent = matches!(material.alpha_mode(), gltf::material::AlphaMode::Blend);
    out.settings.double_sided = material.double_sided();
    out
}
