use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeHandle};
use glam::Affine3A;

/// A minimal scene node containing only essential hot data.
///
/// # Hierarchy
///
/// Nodes form a tree structure through parent-child relationships:
/// - `parent`: Optional handle to parent node (None for root nodes)
/// - `children`: List of child node handles
///
/// # Components
///
/// A node carrying a mesh component is a mesh-bearing leaf from the
/// classifier's point of view; a node without one is a container whose own
/// transform composes with its children's.
#[derive(Debug, Clone)]
pub struct Node {
    // === Core Hierarchy ===
    /// Parent node handle (None for root nodes)
    pub(crate) parent: Option<NodeHandle>,
    /// Child node handles
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    /// Transform component (hot data accessed every frame)
    pub transform: Transform,

    // === Components & State ===
    /// Node name from the authoring tool; possibly empty.
    pub name: String,
    /// Mesh component, present on mesh-bearing leaves.
    pub mesh: Option<MeshKey>,
    /// Visibility flag for culling
    pub visible: bool,
}

impl Node {
    /// Creates a new unnamed container node with default transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            name: String::new(),
            mesh: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn new_named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::new()
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// True when this node carries a mesh component.
    #[inline]
    #[must_use]
    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Returns a reference to the world transformation matrix.
    ///
    /// This matrix transforms local coordinates to world coordinates. It is
    /// only current after [`crate::scene::Scene::update_matrix_world`] (or a
    /// subtree update) has run since the last transform change.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
