//! Resolution of the configured replace table into render overrides.
//!
//! Component names in the replace table refer either to a Tera template in
//! the components directory (`Heading2` -> `components/Heading2.html`) or to
//! a built-in component (`builtin:link`).

mod builtin;
mod template;

use std::path::{Path, PathBuf};

pub use builtin::{BUILTIN_NAMES, BUILTIN_PREFIX, builtin};
pub use template::ComponentLibrary;

use crate::config::ComponentsConfig;
use crate::registry::{ConfigurationError, NodeKind, Overrides, OverridesBuilder, RenderUnit};

#[derive(thiserror::Error, Debug)]
pub enum ComponentError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("component '{name}' not found (expected template at {})", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("unknown builtin component '{0}' (available: {available})", available = BUILTIN_NAMES.join(", "))]
    UnknownBuiltin(String),

    #[error("failed to load component templates from {}: {source}", .path.display())]
    Load { path: PathBuf, source: tera::Error },

    #[error("components.replace[{0}] must map exactly one node kind to a component")]
    InvalidEntry(usize),
}

/// One resolved entry of the replace table, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub kind: NodeKind,
    pub component: String,
}

/// Build the override mapping declared by `config`.
///
/// Entries are processed in order and the last entry for a kind wins. The
/// first invalid entry aborts loading.
pub fn load_overrides(
    config: &ComponentsConfig,
    components_dir: &Path,
) -> Result<(Overrides, Vec<ResolvedEntry>), ComponentError> {
    let library = ComponentLibrary::load(components_dir)?;
    tracing::debug!(
        dir = %components_dir.display(),
        templates = library.template_names().len(),
        "loaded component templates"
    );

    let mut builder = OverridesBuilder::new();
    let mut resolved: Vec<ResolvedEntry> = Vec::new();

    for (i, entry) in config.replace.iter().enumerate() {
        let (kind, component) = entry.pair().ok_or(ComponentError::InvalidEntry(i))?;

        // Reject the node kind before looking at the component
        let kind: NodeKind = kind.parse()?;
        let unit = resolve_component(&library, component, kind)?;
        builder.register_kind(kind, unit)?;

        resolved.retain(|e| e.kind != kind);
        resolved.push(ResolvedEntry {
            kind,
            component: component.to_string(),
        });
        tracing::debug!(%kind, component, "registered override");
    }

    resolved.sort_by_key(|e| e.kind);
    Ok((builder.finish(), resolved))
}

fn resolve_component(
    library: &ComponentLibrary,
    name: &str,
    kind: NodeKind,
) -> Result<RenderUnit, ComponentError> {
    match name.strip_prefix(BUILTIN_PREFIX) {
        Some(builtin_name) => builtin(builtin_name)
            .ok_or_else(|| ComponentError::UnknownBuiltin(builtin_name.to_string())),
        None => library.resolve(name, kind),
    }
}
