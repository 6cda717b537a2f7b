//! Whole-file OBJ import

use std::path::Path;

use log::info;

use super::materials::MaterialLibrary;
use super::mesh_builder::MeshBuilder;
use super::obj_loader::ObjModel;
use super::Result;
use crate::config::ImportConfig;
use crate::foundation::fs::directory_of;
use crate::render::TexturedMeshList;

/// Loads `.obj` files into per-material meshes
#[derive(Debug, Clone, Default)]
pub struct ObjImporter {
    config: ImportConfig,
}

impl ObjImporter {
    /// Create an importer with the given settings
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Active settings
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse the geometry file and every material library it references
    ///
    /// Material library paths are resolved against the geometry file's
    /// directory unless the configuration overrides it.
    pub fn load_model(&self, path: impl AsRef<Path>) -> Result<(ObjModel, MaterialLibrary)> {
        let path = path.as_ref();
        let geometry_dir = directory_of(path);
        let mtl_lib_prefix = self
            .config
            .load_materials
            .then(|| self.config.material_dir_for(&geometry_dir));

        let mut mtl_lib = MaterialLibrary::new();
        let model = ObjModel::load(path, mtl_lib_prefix, &mut mtl_lib)?;
        Ok((model, mtl_lib))
    }

    /// Load `path` and build one textured mesh per material group, in file order
    ///
    /// Any failure discards everything loaded so far.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<TexturedMeshList> {
        let path = path.as_ref();
        let (model, mtl_lib) = self.load_model(path)?;
        let meshes = MeshBuilder::new(&model, &mtl_lib).build_all()?;

        info!(
            "ObjImporter: {} -> {} mesh(es), {} material(s)",
            path.display(),
            meshes.len(),
            mtl_lib.len()
        );
        Ok(meshes)
    }
}

/// Load an `.obj` file with default settings
///
/// Returns one `(mesh, diffuse texture path)` pair per material group.
pub fn load_obj_meshes(path: impl AsRef<Path>) -> Result<TexturedMeshList> {
    ObjImporter::default().load(path)
}
