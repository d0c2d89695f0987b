//! Configuration management for type introspection
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (forsyde.toml)
//! - Environment variables (FORSYDE__*)
//!
//! ## Example config file (forsyde.toml):
//! ```toml
//! [output]
//! path = "build/types.xml"
//! format = "pretty"
//! indent = "  "
//!
//! [registry]
//! on_collision = "error"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::writer::RenderOptions;

/// Main configuration for introspection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntrospectionConfig {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the introspection document is written
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Output layout (pretty or compact)
    #[serde(default)]
    pub format: OutputFormat,

    /// Indentation unit for the pretty layout
    #[serde(default = "default_indent")]
    pub indent: String,
}

/// Output layout for XML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// What to do when two distinct types resolve to the same name
    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

/// Handling of two distinct types sharing one resolved name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Reject the second type with `TypeError::NameCollision`
    #[default]
    Error,
    /// Keep the first entry and silently reuse it for the second type
    Alias,
}

// Default value functions
fn default_output_path() -> PathBuf {
    PathBuf::from("types.xml")
}

fn default_indent() -> String {
    "\t".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::Pretty,
            indent: default_indent(),
        }
    }
}

impl OutputConfig {
    /// Render settings for the writer
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.format,
            indent: self.indent.clone(),
        }
    }
}

impl IntrospectionConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "forsyde.toml",
            ".forsyde.toml",
            "config/forsyde.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("se", "kth", "forsyde") {
            let xdg_config = config_dir.config_dir().join("forsyde.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (FORSYDE__*)
        builder = builder.add_source(
            Environment::with_prefix("FORSYDE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get the output path (resolves relative paths)
    pub fn output_path(&self) -> PathBuf {
        if self.output.path.is_absolute() {
            self.output.path.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.output.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = IntrospectionConfig::default();
        assert_eq!(config.output.path, PathBuf::from("types.xml"));
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert_eq!(config.output.indent, "\t");
        assert_eq!(config.registry.on_collision, CollisionPolicy::Error);
    }

    #[test]
    fn test_serialize_config() {
        let config = IntrospectionConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[registry]"));
        assert!(toml_str.contains("on_collision = \"error\""));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[output]\nformat = \"compact\"\n\n[registry]\non_collision = \"alias\"\n",
        )
        .unwrap();

        let config = IntrospectionConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert_eq!(config.output.indent, "\t");
        assert_eq!(config.registry.on_collision, CollisionPolicy::Alias);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = IntrospectionConfig::default();
        config.output.path = PathBuf::from("out/model_types.xml");

        config.save(path.to_str().unwrap()).unwrap();
        let loaded = IntrospectionConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.output.path, PathBuf::from("out/model_types.xml"));
    }

    #[test]
    fn test_environment_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.toml");
        std::fs::write(&path, "[registry]\non_collision = \"error\"\n").unwrap();

        std::env::set_var("FORSYDE__REGISTRY__ON_COLLISION", "alias");
        let config = IntrospectionConfig::load_from(path.to_str());
        std::env::remove_var("FORSYDE__REGISTRY__ON_COLLISION");

        assert_eq!(config.unwrap().registry.on_collision, CollisionPolicy::Alias);
    }

    #[test]
    fn test_missing_required_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(IntrospectionConfig::load_from(path.to_str()).is_err());
    }
}
