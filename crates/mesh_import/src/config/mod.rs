//! Configuration system

use std::path::{Path, PathBuf};

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Format follows the extension
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings for one OBJ import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Directory used to resolve `mtllib` paths.
    ///
    /// `None` resolves them against the directory of the geometry file.
    pub material_dir: Option<PathBuf>,

    /// Read material libraries referenced by `mtllib`.
    ///
    /// When disabled every group uses the default material.
    pub load_materials: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            material_dir: None,
            load_materials: true,
        }
    }
}

impl Config for ImportConfig {}

impl ImportConfig {
    /// Directory `mtllib` paths are joined onto for a geometry file in `geometry_dir`
    pub fn material_dir_for<'a>(&'a self, geometry_dir: &'a Path) -> &'a Path {
        self.material_dir.as_deref().unwrap_or(geometry_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_loads_materials_from_geometry_dir() {
        let config = ImportConfig::default();
        assert!(config.load_materials);
        assert_eq!(config.material_dir_for(Path::new("models")), Path::new("models"));
    }

    #[test]
    fn test_material_dir_override() {
        let config = ImportConfig {
            material_dir: Some(PathBuf::from("shared/materials")),
            ..Default::default()
        };
        assert_eq!(
            config.material_dir_for(Path::new("models")),
            Path::new("shared/materials")
        );
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.toml");

        let config = ImportConfig {
            material_dir: Some(PathBuf::from("mtl")),
            load_materials: false,
        };
        config.save_to_file(&path).unwrap();

        let loaded = ImportConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.ron");
        std::fs::write(&path, "(load_materials: false)").unwrap();

        let loaded = ImportConfig::load_from_file(&path).unwrap();
        assert!(!loaded.load_materials);
        assert_eq!(loaded.material_dir, None);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.ini");
        std::fs::write(&path, "load_materials = true").unwrap();

        assert!(matches!(
            ImportConfig::load_from_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
