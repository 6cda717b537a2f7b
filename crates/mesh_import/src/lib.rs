//! # Mesh Import
//!
//! Loader for Wavefront-style `.obj` geometry files and their companion `.mtl`
//! material libraries.
//!
//! ## Features
//!
//! - **Tolerant parsing**: malformed or unknown directives are reported through
//!   the `log` facade and skipped instead of aborting the whole file
//! - **Polygon support**: faces with any number of corners are fan-triangulated
//! - **Normal synthesis**: triangles without normals receive their flat face normal
//! - **Per-material output**: one non-indexed triangle mesh per `usemtl` group,
//!   paired with the material's diffuse texture path
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mesh_import::prelude::*;
//!
//! fn main() -> Result<(), ImportError> {
//!     for textured in load_obj_meshes("models/teapot.obj")? {
//!         println!(
//!             "{} triangles, texture '{}'",
//!             textured.mesh.triangle_count(),
//!             textured.texture_path
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_possible_truncation)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;

pub use assets::{load_obj_meshes, ImportError, ObjImporter};
pub use config::{Config, ConfigError, ImportConfig};
pub use render::{TexturedMesh, TexturedMeshList, TriangleMesh};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{
            load_obj_meshes, ImportError, ObjImporter, ObjModel,
            materials::{Material, MaterialLibrary},
        },
        config::{Config, ImportConfig},
        foundation::math::{Vec2, Vec3, Vec4},
        render::{TexturedMesh, TexturedMeshList, TriangleMesh},
    };
}
