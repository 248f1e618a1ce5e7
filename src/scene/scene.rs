use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;
use slotmap::SlotMap;

use crate::resources::geometry::BoundingBox;
use crate::resources::material::Material;
use crate::resources::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::{MaterialKey, MeshKey, NodeHandle};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph container.
///
/// Pure data layer: node hierarchy plus mesh/material pools. The viewer
/// controller and the tween scheduler mutate it; nothing here talks to a
/// renderer.
pub struct Scene {
    pub id: u32,

    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Component/resource pools ====
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub materials: SlotMap<MaterialKey, Material>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
        }
    }

    // ========================================================================
    // Node creation & hierarchy
    // ========================================================================

    /// Adds a node at the scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let idx = self.nodes.insert(node);
        self.root_nodes.push(idx);
        idx
    }

    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::new_named(name))
    }

    pub fn add_to_parent(&mut self, child: Node, parent_idx: NodeHandle) -> NodeHandle {
        let idx = self.nodes.insert(child);

        if let Some(p) = self.nodes.get_mut(parent_idx) {
            p.children.push(idx);
        }
        if let Some(c) = self.nodes.get_mut(idx) {
            c.parent = Some(parent_idx);
        }

        idx
    }

    /// Creates a mesh-bearing leaf at the scene root.
    pub fn add_mesh(&mut self, mesh: Mesh) -> NodeHandle {
        let mut node = Node::new_named(&mesh.name);
        node.mesh = Some(self.meshes.insert(mesh));
        self.add_node(node)
    }

    pub fn add_mesh_to_parent(&mut self, mesh: Mesh, parent: NodeHandle) -> NodeHandle {
        let mut node = Node::new_named(&mesh.name);
        node.mesh = Some(self.meshes.insert(mesh));
        self.add_to_parent(node, parent)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    /// Re-parents `child_idx` under `parent_idx`, detaching it from its old
    /// parent (or the root list) first. The child keeps its local transform,
    /// so its world placement changes with the new parent.
    pub fn attach(&mut self, child_idx: NodeHandle, parent_idx: NodeHandle) {
        if child_idx == parent_idx {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        // 1. Detach from old
        let old_parent = self.nodes.get(child_idx).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child_idx)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child_idx) {
            self.root_nodes.remove(i);
        }

        // 2. Attach to new
        if let Some(p) = self.nodes.get_mut(parent_idx) {
            p.children.push(child_idx);
        } else {
            log::error!("Parent node not found during attach!");
            // Keep the child reachable rather than leaking it
            self.root_nodes.push(child_idx);
            return;
        }

        // 3. Update child
        if let Some(c) = self.nodes.get_mut(child_idx) {
            c.parent = Some(parent_idx);
            c.transform.mark_dirty();
        }
    }

    /// Re-parents `child_idx` under `parent_idx` while preserving the
    /// child's world transform: new local = inverse(parent world) × child
    /// world.
    ///
    /// Both world matrices must be current (run [`Scene::update_matrix_world`]
    /// or a subtree update first). Returns `false` without touching the
    /// hierarchy when either node is missing or the recomputed local matrix
    /// is non-finite (degenerate parent scale); callers fall back to a plain
    /// [`Scene::attach`].
    pub fn attach_keeping_world(&mut self, child_idx: NodeHandle, parent_idx: NodeHandle) -> bool {
        if child_idx == parent_idx {
            return false;
        }
        let Some(parent_world) = self.nodes.get(parent_idx).map(|n| n.transform.world_matrix)
        else {
            return false;
        };
        let Some(child_world) = self.nodes.get(child_idx).map(|n| n.transform.world_matrix)
        else {
            return false;
        };

        let new_local = parent_world.inverse() * child_world;
        if !new_local.is_finite() {
            return false;
        }

        self.attach(child_idx, parent_idx);
        if let Some(c) = self.nodes.get_mut(child_idx) {
            c.transform.apply_local_matrix(new_local);
        }
        true
    }

    /// Removes a node and its whole subtree, including the mesh components
    /// and the materials those meshes reference.
    pub fn remove_node(&mut self, idx: NodeHandle) {
        let children = if let Some(node) = self.nodes.get(idx) {
            node.children.clone()
        } else {
            return;
        };

        for child in children {
            self.remove_node(child);
        }

        // Unlink from parent or root list
        let parent_opt = self.nodes.get(idx).and_then(|n| n.parent);
        if let Some(parent_idx) = parent_opt {
            if let Some(parent) = self.nodes.get_mut(parent_idx)
                && let Some(pos) = parent.children.iter().position(|&x| x == idx)
            {
                parent.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&x| x == idx) {
            self.root_nodes.remove(pos);
        }

        // Clean up components
        if let Some(node) = self.nodes.get(idx)
            && let Some(mesh_key) = node.mesh
            && let Some(mesh) = self.meshes.remove(mesh_key)
        {
            for material_key in mesh.materials {
                // Shared materials may already be gone; remove is a no-op then.
                self.materials.remove(material_key);
            }
        }

        self.nodes.remove(idx);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn get_node(&self, idx: NodeHandle) -> Option<&Node> {
        self.nodes.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(idx)
    }

    #[must_use]
    pub fn get_name(&self, idx: NodeHandle) -> Option<&str> {
        self.nodes.get(idx).map(|n| n.name.as_str())
    }

    pub fn set_name(&mut self, idx: NodeHandle, name: &str) {
        if let Some(node) = self.nodes.get_mut(idx) {
            name.clone_into(&mut node.name);
        }
    }

    #[must_use]
    pub fn get_material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    pub fn get_material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    /// Material keys referenced by the mesh component of `idx`, if any.
    #[must_use]
    pub fn node_material_keys(&self, idx: NodeHandle) -> Vec<MaterialKey> {
        self.nodes
            .get(idx)
            .and_then(|n| n.mesh)
            .and_then(|key| self.meshes.get(key))
            .map(|mesh| mesh.materials.clone())
            .unwrap_or_default()
    }

    // ========================================================================
    // Traversal queries
    // ========================================================================

    /// Collects `idx` and all its descendants in depth-first order.
    #[must_use]
    pub fn collect_subtree(&self, idx: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// True when the subtree rooted at `idx` (including `idx` itself)
    /// contains at least one mesh-bearing node.
    #[must_use]
    pub fn has_mesh_descendant(&self, idx: NodeHandle) -> bool {
        let mut stack = vec![idx];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if node.mesh.is_some() {
                return true;
            }
            stack.extend_from_slice(&node.children);
        }
        false
    }

    // ========================================================================
    // Matrix update pipeline
    // ========================================================================

    /// Updates world matrices for the whole scene. Must run before any
    /// world-space query after transforms changed.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    /// Updates world matrices for one subtree only.
    pub fn update_subtree(&mut self, root_idx: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, root_idx);
    }

    // ========================================================================
    // World-space queries
    // ========================================================================

    /// World-space origin of a node. Requires current world matrices.
    #[must_use]
    pub fn world_position(&self, idx: NodeHandle) -> Option<Vec3> {
        self.nodes
            .get(idx)
            .map(|n| n.transform.world_matrix.translation.into())
    }

    fn node_own_bbox(&self, idx: NodeHandle) -> Option<BoundingBox> {
        let node = self.get_node(idx)?;
        let mesh_key = node.mesh?;
        let mesh = self.meshes.get(mesh_key)?;

        let local = mesh.geometry.bounding_box;
        if local.is_empty() {
            return None;
        }
        Some(local.transform(&node.transform.world_matrix))
    }

    /// World-space bounding box of a node and its descendants, derived on
    /// demand from mesh-local bounds and current world matrices. Never
    /// cached; recompute after any transform change. `None` when the
    /// subtree carries no usable geometry.
    #[must_use]
    pub fn compute_world_bbox(&self, idx: NodeHandle) -> Option<BoundingBox> {
        let mut combined: Option<BoundingBox> = None;

        for handle in self.collect_subtree(idx) {
            if let Some(bbox) = self.node_own_bbox(handle) {
                combined = Some(match combined {
                    Some(existing) => existing.union(&bbox),
                    None => bbox,
                });
            }
        }

        combined
    }
}
