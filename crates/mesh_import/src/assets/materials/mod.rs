//! Material records and the `.mtl` parser
//!
//! Materials are stored by value inside a [`MaterialLibrary`]; groups in the
//! geometry refer to them by index.

pub mod material;
pub mod mtl_parser;

pub use material::{Material, MaterialFlags, MaterialLibrary, DEFAULT_MATERIAL_NAME};
pub use mtl_parser::MtlParser;
