//! Transform system.
//!
//! Propagates world matrices through the scene hierarchy, decoupled from
//! `Scene` so it only borrows the node pool and the root list.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every node reachable from `roots`.
///
/// Uses an explicit stack instead of recursion so deep hierarchies cannot
/// overflow the call stack.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // Work stack: (node handle, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;
        let children_count = node.children.len();

        // Push children in reverse to preserve traversal order.
        for i in (0..children_count).rev() {
            if let Some(node) = nodes.get(node_handle)
                && let Some(&child_handle) = node.children.get(i)
            {
                stack.push((child_handle, current_world, world_needs_update));
            }
        }
    }
}

/// Updates the subtree rooted at `root_handle`, seeding from the parent's
/// current world matrix. Used for local refreshes (e.g. a freshly inserted
/// wheel-group container) without walking the whole scene.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root_handle: NodeHandle) {
    let parent_world = if let Some(node) = nodes.get(root_handle) {
        if let Some(parent_handle) = node.parent {
            nodes
                .get(parent_handle)
                .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix)
        } else {
            Affine3A::IDENTITY
        }
    } else {
        return;
    };

    let mut stack: Vec<(NodeHandle, Affine3A)> = vec![(root_handle, parent_world)];

    while let Some((node_handle, parent_world_matrix)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        node.transform.update_local_matrix();
        let new_world = parent_world_matrix * *node.transform.local_matrix();
        node.transform.set_world_matrix(new_world);

        let children_count = node.children.len();
        for i in (0..children_count).rev() {
            if let Some(node) = nodes.get(node_handle)
                && let Some(&child_handle) = node.children.get(i)
            {
                stack.push((child_handle, new_world));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn hierarchy_update_composes_parent_child() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new();
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new();
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes
            .get_mut(parent_handle)
            .unwrap()
            .children
            .push(child_handle);

        update_hierarchy_iterative(&mut nodes, &[parent_handle]);

        let child_world_pos = nodes
            .get(child_handle)
            .unwrap()
            .transform
            .world_matrix
            .translation;
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }
}
