//! Data resources shared across the scene graph:
//! - Geometry: axis-aligned bounding volumes
//! - Material: tagged material model with capability predicates
//! - Mesh: geometry + material references carried by a scene node

pub mod geometry;
pub mod material;
pub mod mesh;

pub use geometry::{BoundingBox, Geometry};
pub use material::{Material, MaterialData, MaterialSettings, PhysicalMaterial, UnlitMaterial};
pub use mesh::Mesh;
