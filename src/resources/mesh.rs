use crate::resources::geometry::Geometry;
use crate::scene::MaterialKey;

/// Renderable payload attached to a leaf node.
///
/// Multi-primitive glTF meshes collapse into one `Mesh` whose geometry is
/// the union of the primitive bounds and whose `materials` list carries one
/// entry per primitive.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub materials: Vec<MaterialKey>,
}

impl Mesh {
    #[must_use]
    pub fn new(name: &str, geometry: Geometry, materials: Vec<MaterialKey>) -> Self {
        Self {
            name: name.to_owned(),
            geometry,
            materials,
        }
    }
}
