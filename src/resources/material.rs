use glam::{Vec3, Vec4};

/// Pipeline-level material settings, shared by all variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialSettings {
    /// Alpha-blended material. Glass detection treats this as authoritative
    /// alongside the opacity scalar.
    pub transparent: bool,
    pub double_sided: bool,
    pub wireframe: bool,
}

/// Physically-based material parameters (metalness/roughness workflow).
///
/// A mesh carrying one of these is considered paintable.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalMaterial {
    pub color: Vec4,
    pub metalness: f32,
    pub roughness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub opacity: f32,
}

impl PhysicalMaterial {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            metalness: 0.0,
            roughness: 1.0,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            emissive: Vec3::ZERO,
            emissive_intensity: 1.0,
            opacity: 1.0,
        }
    }
}

impl Default for PhysicalMaterial {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}

/// Flat, unlit material. Not paintable: repainting a baked/unlit surface
/// would discard its authored look.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlitMaterial {
    pub color: Vec4,
    pub opacity: f32,
}

impl UnlitMaterial {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }
}

impl Default for UnlitMaterial {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}

/// Tagged material model.
///
/// Classification matches on the variant instead of probing for field
/// presence: `Physical` answers the paintability capability query, `Unlit`
/// and `Other` do not. `Other` stands for externally-authored materials the
/// loader could not map.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialData {
    Physical(PhysicalMaterial),
    Unlit(UnlitMaterial),
    Other,
}

/// A material as referenced by meshes: a name from the asset plus the
/// tagged parameter block and shared settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub data: MaterialData,
    pub settings: MaterialSettings,
}

impl Material {
    #[must_use]
    pub fn new(data: MaterialData) -> Self {
        Self {
            name: String::new(),
            data,
            settings: MaterialSettings::default(),
        }
    }

    #[must_use]
    pub fn new_physical(color: Vec4) -> Self {
        Self::new(MaterialData::Physical(PhysicalMaterial::new(color)))
    }

    #[must_use]
    pub fn new_unlit(color: Vec4) -> Self {
        Self::new(MaterialData::Unlit(UnlitMaterial::new(color)))
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    /// Capability query: does this material accept metalness/roughness-style
    /// physically-based parameters (i.e. can it be repainted)?
    #[must_use]
    pub fn supports_pbr(&self) -> bool {
        matches!(self.data, MaterialData::Physical(_))
    }

    /// Effective opacity scalar; `Other` materials report fully opaque.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        match &self.data {
            MaterialData::Physical(m) => m.opacity,
            MaterialData::Unlit(m) => m.opacity,
            MaterialData::Other => 1.0,
        }
    }

    /// Transparency indicator used by the glass heuristic: the explicit
    /// blend flag, or an opacity below `opacity_threshold`.
    #[must_use]
    pub fn is_transparent(&self, opacity_threshold: f32) -> bool {
        self.settings.transparent || self.opacity() < opacity_threshold
    }

    pub fn as_physical(&self) -> Option<&PhysicalMaterial> {
        match &self.data {
            MaterialData::Physical(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_physical_mut(&mut self) -> Option<&mut PhysicalMaterial> {
        match &mut self.data {
            MaterialData::Physical(m) => Some(m),
            _ => None,
        }
    }
}

impl From<PhysicalMaterial> for Material {
    fn from(data: PhysicalMaterial) -> Self {
        Material::new(MaterialData::Physical(data))
    }
}

impl From<UnlitMaterial> for Material {
    fn from(data: UnlitMaterial) -> Self {
        Material::new(MaterialData::Unlit(data))
    }
}
