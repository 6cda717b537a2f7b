//! Material data and material library

use std::collections::HashMap;

use bitflags::bitflags;

use crate::foundation::math::Vec4;

/// Identifier of the default material kept at index 0 of every library
pub const DEFAULT_MATERIAL_NAME: &str = "default";

bitflags! {
    /// Surface classification bits for renderers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u32 {
        /// Light passes through the surface
        const TRANSMITTING = 1 << 31;
        /// Surface has a specular lobe
        const SPECULAR = 1 << 30;
        /// Surface emits light
        const EMISSIVE = 1 << 29;
        /// Surface emits environment light
        const EMISSIVE_ENV = 1 << 28;
    }
}

/// Reflection properties of a surface (Wavefront Phong model)
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Name used by `usemtl`
    pub identifier: String,
    /// Diffuse texture path (`map_Kd`), empty if unset
    pub diffuse_texture: String,
    /// Diffuse color (`Kd`)
    pub diffuse: Vec4,
    /// Ambient color (`Ka`)
    pub ambient: Vec4,
    /// Specular color (`Ks`)
    pub specular: Vec4,
    /// Emissive color (`Ke`)
    pub emissive: Vec4,
    /// Blinn-Phong shininess exponent (`Ns`)
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            diffuse_texture: String::new(),
            diffuse: Vec4::zeros(),
            ambient: Vec4::zeros(),
            specular: Vec4::zeros(),
            emissive: Vec4::zeros(),
            shininess: 1.0,
        }
    }
}

impl Material {
    /// Create a fully absorbing material with the given identifier
    pub fn named(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    /// Reset every parameter to completely absorbing, clearing the identifier
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the material emits light
    pub fn is_emitting(&self) -> bool {
        self.emissive.xyz().iter().any(|&c| c > 0.0)
    }

    /// Classification bits derived from the stored colors
    pub fn flags(&self) -> MaterialFlags {
        let mut flags = MaterialFlags::empty();
        if self.is_emitting() {
            flags |= MaterialFlags::EMISSIVE;
        }
        if self.specular.xyz().iter().any(|&c| c > 0.0) {
            flags |= MaterialFlags::SPECULAR;
        }
        flags
    }
}

/// Ordered collection of materials with lookup by name
///
/// Names map to the index of the most recently added material with that name.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    material_ids: HashMap<String, usize>,
}

impl MaterialLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library holds no materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Remove every material
    pub fn clear(&mut self) {
        self.materials.clear();
        self.material_ids.clear();
    }

    /// Material at `index`
    pub fn get(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    /// Index of the material called `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.material_ids.get(name).copied()
    }

    /// Material called `name`
    pub fn by_name(&self, name: &str) -> Option<&Material> {
        self.index_of(name).and_then(|index| self.get(index))
    }

    /// Append a material and return its index
    pub fn add(&mut self, material: Material) -> usize {
        let index = self.materials.len();
        self.material_ids.insert(material.identifier.clone(), index);
        self.materials.push(material);
        index
    }

    /// Insert the default material at index 0 if the library is empty
    pub fn ensure_default(&mut self) {
        if self.materials.is_empty() {
            self.add(Material::named(DEFAULT_MATERIAL_NAME));
        }
    }

    /// Iterate over the materials in index order
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_is_fully_absorbing() {
        let mut mat = Material::named("brass");
        mat.diffuse = Vec4::new(0.8, 0.6, 0.2, 1.0);
        mat.shininess = 96.0;
        mat.diffuse_texture = "brass.png".to_string();

        mat.reset();
        assert_eq!(mat, Material::default());
        assert_eq!(mat.shininess, 1.0);
        assert!(mat.identifier.is_empty());
    }

    #[test]
    fn test_emission_and_flags() {
        let mut mat = Material::named("lamp");
        assert!(!mat.is_emitting());
        assert_eq!(mat.flags(), MaterialFlags::empty());

        // Alpha alone does not count as emission
        mat.emissive = Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(!mat.is_emitting());

        mat.emissive = Vec4::new(0.0, 0.5, 0.0, 1.0);
        mat.specular = Vec4::new(0.2, 0.2, 0.2, 1.0);
        assert!(mat.is_emitting());
        assert_eq!(mat.flags(), MaterialFlags::EMISSIVE | MaterialFlags::SPECULAR);
    }

    #[test]
    fn test_later_names_win_lookup() {
        let mut lib = MaterialLibrary::new();
        lib.ensure_default();
        let first = lib.add(Material::named("hull"));
        let second = lib.add(Material::named("hull"));

        assert_eq!(lib.len(), 3);
        assert_eq!(first, 1);
        assert_eq!(lib.index_of("hull"), Some(second));
        assert_eq!(lib.index_of("missing"), None);
    }

    #[test]
    fn test_ensure_default_only_when_empty() {
        let mut lib = MaterialLibrary::new();
        lib.ensure_default();
        lib.ensure_default();
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.get(0).unwrap().identifier, DEFAULT_MATERIAL_NAME);

        lib.clear();
        assert!(lib.is_empty());
        assert!(lib.by_name(DEFAULT_MATERIAL_NAME).is_none());
    }
}
