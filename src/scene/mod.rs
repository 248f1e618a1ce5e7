//! Scene graph:
//! - Node: scene node (hierarchy + transform + optional mesh component)
//! - Transform: TRS component with cached matrices and dirty check
//! - Scene: node/mesh/material pools and hierarchy operations
//! - `transform_system`: decoupled world-matrix propagation

pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct MaterialKey;
}
