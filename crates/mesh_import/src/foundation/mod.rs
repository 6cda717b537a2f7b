//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the importer:
//! - Math types
//! - Path helpers
//! - Logging utilities

pub mod math;
pub mod fs;
pub mod logging;
