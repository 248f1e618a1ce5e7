use glam::{Affine3A, Vec3};

/// Axis-aligned bounding box.
///
/// Whether the corners are in local or world space depends on the producer:
/// a [`Geometry`] carries a local-space box, [`crate::scene::Scene`] bbox
/// queries return world-space boxes. World-space boxes are always derived on
/// demand and must be recomputed after any reparenting or scaling before
/// being read again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// The empty box: the identity element of [`BoundingBox::union`].
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the box diagonal; the asset-scale-relative reference used
    /// by the explode offset.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grows the box to contain `point`.
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// True when no point was ever added (min > max on some axis).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True for a non-empty box with finite corners. Malformed geometry
    /// (NaN/infinite vertex data) fails this and callers fall back to
    /// default placement instead of normalizing.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.min.is_finite() && self.max.is_finite()
    }

    /// Transforms all eight corners and re-wraps them in an axis-aligned box.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut out = Self::EMPTY;
        for point in corners {
            out.expand(matrix.transform_point3(point));
        }
        out
    }
}

/// Geometry metadata carried by a mesh.
///
/// The viewer core never touches vertex or index payloads; those stay with
/// the renderer. Only the local-space bounds (straight from the position
/// accessor min/max) and the vertex count are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geometry {
    pub bounding_box: BoundingBox,
    pub vertex_count: u32,
}

impl Geometry {
    #[must_use]
    pub fn new(bounding_box: BoundingBox, vertex_count: u32) -> Self {
        Self {
            bounding_box,
            vertex_count,
        }
    }

    #[must_use]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            bounding_box: BoundingBox::new(min, max),
            vertex_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_is_union_identity() {
        let b = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(2.0));
        assert_eq!(BoundingBox::EMPTY.union(&b), b);
        assert!(BoundingBox::EMPTY.is_empty());
        assert!(!BoundingBox::EMPTY.is_valid());
    }

    #[test]
    fn transform_rewraps_rotated_corners() {
        let b = BoundingBox::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 2.0));
        let m = Affine3A::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let t = b.transform(&m);
        // A quarter turn around Y swaps the X and Z extents.
        assert!((t.size().x - 4.0).abs() < 1e-5);
        assert!((t.size().z - 2.0).abs() < 1e-5);
    }
}
