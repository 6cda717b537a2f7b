//! Mesh containers produced by the importer

pub mod mesh;

pub use mesh::{TexturedMesh, TexturedMeshList, TriangleMesh};
