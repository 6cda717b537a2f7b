//! Wavefront asset loading
//!
//! The `.obj` parser ([`ObjModel`]) collects raw attributes, triangulated
//! faces and material groups, pulling in `.mtl` libraries through
//! [`MtlParser`] when it meets `mtllib`. [`MeshBuilder`] then expands each
//! group into a non-indexed [`TriangleMesh`](crate::render::TriangleMesh).
//! [`ObjImporter`] ties the steps together.

pub mod line_reader;
pub mod directive;
pub mod materials;
pub mod face_reader;
pub mod obj_loader;
pub mod mesh_builder;
pub mod importer;


pub use line_reader::LineReader;
pub use materials::{Material, MaterialFlags, MaterialLibrary, MtlParser};
pub use face_reader::FaceCorner;
pub use obj_loader::{Group, ModelFace, ObjModel, NO_INDEX};
pub use mesh_builder::MeshBuilder;
pub use importer::{load_obj_meshes, ObjImporter};

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Which array an index points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Vertex positions
    Position,
    /// Texture coordinates
    TexCoord,
    /// Vertex normals
    Normal,
    /// Material groups
    Group,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Position => "position",
            Self::TexCoord => "texture coordinate",
            Self::Normal => "normal",
            Self::Group => "group",
        })
    }
}

/// Import errors
///
/// Any of these aborts the whole load; no partial result is returned.
#[derive(Error, Debug)]
pub enum ImportError {
    /// A geometry or material file could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        /// File that failed to open
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO error while reading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unparsable face data
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Face with fewer than three corners
    #[error("Invalid face on line {line}: {corners} corner(s), at least 3 required")]
    InvalidFace {
        /// 1-based line number
        line: usize,
        /// Number of corners found
        corners: usize,
    },

    /// A material library referenced by `mtllib` failed to load
    #[error("Material library {} failed to load: {source}", .path.display())]
    MaterialLibrary {
        /// Resolved library path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: Box<ImportError>,
    },

    /// A face index does not address an existing element
    #[error("{kind} index {index} out of range ({len} available)")]
    IndexOutOfRange {
        /// Array the index points into
        kind: IndexKind,
        /// Index as written in the file (1-based for face data)
        index: i64,
        /// Length of the array
        len: usize,
    },
}
