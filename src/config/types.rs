//! Configuration type definitions.
//!
//! This module contains all the data structures used in mdreplace configuration files.
//! These types are pure data - no I/O or complex logic.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Site configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Arbitrary values passed to the layout as `site.params`
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

fn default_output() -> PathBuf {
    PathBuf::from("_site")
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

// =============================================================================
// Integrations
// =============================================================================

/// Third-party integrations wired into the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integration {
    /// Link the externally built utility stylesheet from every page
    Tailwind,
    /// Treat `.mdx` files as content
    Mdx,
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
    /// Parse `$inline$` and `$$display$$` math and load KaTeX on pages
    #[serde(default = "default_math")]
    pub math: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

fn default_markdown_extensions() -> Vec<String> {
    vec![
        "definition_lists".to_string(),
        "footnotes".to_string(),
        "gfm".to_string(),
        "heading_attributes".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

fn default_math() -> bool {
    true
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
            math: default_math(),
            highlight: HighlightConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Highlighting theme name used for the generated stylesheet
    #[serde(default = "default_highlight_theme")]
    pub theme: String,
}

fn default_highlight_theme() -> String {
    "github_light".to_string()
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: default_highlight_theme(),
        }
    }
}

// =============================================================================
// Component overrides
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentsConfig {
    /// Directory holding component templates (relative to the config file)
    #[serde(default = "default_components_path")]
    pub path: PathBuf,
    /// Ordered replace table; later entries for the same kind win
    #[serde(default)]
    pub replace: Vec<ReplaceEntry>,
}

fn default_components_path() -> PathBuf {
    PathBuf::from("components")
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            path: default_components_path(),
            replace: Vec::new(),
        }
    }
}

/// One entry of the replace table.
///
/// Supports two formats in YAML:
/// ```yaml
/// replace:
///   - h2: Heading2                          # Short form
///   - kind: a                               # Explicit form
///     component: builtin:link
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplaceEntry {
    /// Must come first so serde tries it before the map variant
    Explicit { kind: String, component: String },
    /// A single-key map: { "kind": "Component" }
    Short(HashMap<String, String>),
}

impl ReplaceEntry {
    pub fn new(kind: impl Into<String>, component: impl Into<String>) -> Self {
        let mut map = HashMap::new();
        map.insert(kind.into(), component.into());
        ReplaceEntry::Short(map)
    }

    /// The `(kind, component)` pair, or `None` for a map that does not have
    /// exactly one key.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match self {
            ReplaceEntry::Explicit { kind, component } => Some((kind, component)),
            ReplaceEntry::Short(map) if map.len() == 1 => map
                .iter()
                .next()
                .map(|(k, v)| (k.as_str(), v.as_str())),
            ReplaceEntry::Short(_) => None,
        }
    }
}
