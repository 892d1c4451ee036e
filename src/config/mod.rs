//! Configuration loading and types for mdreplace.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files (`load`)

mod load;
mod types;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use load::{DEFAULT_CONFIG_FILE, base_path_from_config};
pub use types::{
    ComponentsConfig, HighlightConfig, Integration, MarkdownConfig, ReplaceEntry, SiteConfig,
};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to encode config file path as a unicode string: {}", .0.display())]
    EncodePath(PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("{0}")]
    Validation(String),
}

// =============================================================================
// Top-level config
// =============================================================================

/// The site configuration, read from `mdreplace.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    /// Directory containing markdown content
    #[serde(default = "default_content")]
    pub content: PathBuf,
    /// Directory copied verbatim into the output
    #[serde(default = "default_public")]
    pub public: PathBuf,
    /// Custom page layout template (built-in layout when omitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<PathBuf>,
    #[serde(default)]
    pub integrations: Vec<Integration>,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub components: ComponentsConfig,
}

fn default_content() -> PathBuf {
    PathBuf::from("content")
}

fn default_public() -> PathBuf {
    PathBuf::from("public")
}

impl Config {
    /// A minimal configuration with defaults for everything but the site name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                name: name.into(),
                url: None,
                output: PathBuf::from("_site"),
                params: serde_json::Value::Object(Default::default()),
            },
            content: default_content(),
            public: default_public(),
            layout: None,
            integrations: Vec::new(),
            markdown: MarkdownConfig::default(),
            components: ComponentsConfig::default(),
        }
    }

    /// Returns true if the integration is enabled.
    pub fn has_integration(&self, integration: Integration) -> bool {
        self.integrations.contains(&integration)
    }

    /// Check constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "invalid config: 'site.name' must not be empty".to_string(),
            ));
        }

        for (i, entry) in self.components.replace.iter().enumerate() {
            if entry.pair().is_none() {
                return Err(ConfigError::Validation(format!(
                    "invalid config: components.replace[{i}] must map exactly one node kind to a component\n\nExample:\n  replace:\n    - h2: Heading2"
                )));
            }
        }

        Ok(())
    }

    /// Resolve a config-relative path against the config file's directory.
    pub fn resolve_path(&self, base_path: &Path, path: &Path) -> PathBuf {
        if path.is_relative() {
            base_path.join(path)
        } else {
            path.to_path_buf()
        }
    }

    pub fn output_dir(&self, base_path: &Path) -> PathBuf {
        self.resolve_path(base_path, &self.site.output)
    }

    pub fn content_dir(&self, base_path: &Path) -> PathBuf {
        self.resolve_path(base_path, &self.content)
    }

    pub fn public_dir(&self, base_path: &Path) -> PathBuf {
        self.resolve_path(base_path, &self.public)
    }

    pub fn components_dir(&self, base_path: &Path) -> PathBuf {
        self.resolve_path(base_path, &self.components.path)
    }
}
