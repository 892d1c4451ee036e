use std::path::{Path, PathBuf};

use crate::components::{ComponentError, ResolvedEntry, load_overrides};
use crate::config::Config;
use crate::registry::Overrides;

use super::document::Document;
use super::format::{FormatContext, FormatError, FormatOutput, FormatRegistry};
use super::highlight::SyntaxHighlighter;
use super::page::{PageAssets, PageContext, PageError, PageInfo, PageRenderer, SiteContext};
use super::paths::{source_path_to_url, url_to_output_path};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("component error: {0}")]
    Components(#[from] ComponentError),

    #[error("failed to render {}: {source}", .path.display())]
    Format { path: PathBuf, source: FormatError },

    #[error("no content format handles {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("page error: {0}")]
    Page(#[from] PageError),

    #[error("content directory not found: {}", .0.display())]
    ContentNotFound(PathBuf),

    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct BuildResult {
    pub output_dir: PathBuf,
    pub documents: usize,
    pub drafts: usize,
    pub static_files: usize,
    /// Number of node kinds with a registered override
    pub overrides: usize,
}

pub struct Builder {
    config: Config,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
}

impl Builder {
    pub fn new(config: Config, base_path: PathBuf) -> Self {
        Self { config, base_path }
    }

    /// Resolve the configured replace table.
    pub fn overrides(&self) -> Result<(Overrides, Vec<ResolvedEntry>), BuildError> {
        let components_dir = self.config.components_dir(&self.base_path);
        Ok(load_overrides(&self.config.components, &components_dir)?)
    }

    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        // Build steps:
        // 1. Resolve overrides (any configuration error stops here)
        // 2. Discover documents
        // 3. Render and write each document
        // 4. Write highlight CSS
        // 5. Copy public files

        let (overrides, _) = self.overrides()?;
        tracing::info!("Registered {} override(s)", overrides.len());

        let content_dir = self.config.content_dir(&self.base_path);
        if !content_dir.is_dir() {
            return Err(BuildError::ContentNotFound(content_dir));
        }

        let formats = FormatRegistry::for_config(&self.config);
        let mut sources = Vec::new();
        walk_directory(&content_dir, Path::new(""), &mut |relative| {
            if formats.is_document(relative) {
                sources.push(relative.to_path_buf());
            }
        })?;
        sources.sort();
        tracing::info!(
            "Found {} document(s) in {}",
            sources.len(),
            content_dir.display()
        );

        let highlighter = SyntaxHighlighter::new(&self.config.markdown.highlight.theme);
        let highlight_css = highlighter.generate_css();
        if highlight_css.is_none() {
            tracing::warn!(
                theme = highlighter.theme_name(),
                "unknown highlight theme, highlight.css will not be written"
            );
        }

        let layout = self
            .config
            .layout
            .as_ref()
            .map(|layout| self.config.resolve_path(&self.base_path, layout));
        let renderer = PageRenderer::new(layout.as_deref())?;

        let output_dir = self.config.output_dir(&self.base_path);
        std::fs::create_dir_all(&output_dir)?;

        let ctx = FormatContext {
            highlighter: &highlighter,
            markdown_config: &self.config.markdown,
            overrides: &overrides,
        };
        let site = SiteContext::from_config(&self.config);
        let assets = PageAssets::for_config(&self.config, highlight_css.is_some());

        let mut documents = 0;
        let mut drafts = 0;
        for source_path in &sources {
            let raw = std::fs::read_to_string(content_dir.join(source_path))?;
            let doc = Document::parse(source_path.clone(), source_path_to_url(source_path), &raw);

            if doc.is_draft() {
                tracing::info!("Skipping draft {}", source_path.display());
                drafts += 1;
                continue;
            }

            let output = render_document(&formats, &doc, &ctx)?;
            let context = PageContext {
                site: site.clone(),
                page: PageInfo {
                    title: doc.title(&output.toc),
                    url: doc.url_path.clone(),
                    description: doc.front_matter.description.clone(),
                    extra: doc.front_matter.extra.clone(),
                },
                content: output.html,
                toc: output.toc,
                assets: assets.clone(),
            };
            let html = renderer.render_page(&context)?;

            let output_path = url_to_output_path(&doc.url_path, &output_dir);
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, html)?;
            tracing::debug!("Wrote {} -> {}", source_path.display(), output_path.display());
            documents += 1;
        }

        if let Some(css) = highlight_css {
            std::fs::write(output_dir.join("highlight.css"), css)?;
        }

        let public_dir = self.config.public_dir(&self.base_path);
        let static_files = if public_dir.is_dir() {
            copy_directory(&public_dir, &output_dir)?
        } else {
            0
        };

        let display_output = output_dir.canonicalize().unwrap_or(output_dir.clone());
        tracing::info!(
            "Wrote {} page(s) and {} static file(s) to {}",
            documents,
            static_files,
            display_output.display()
        );

        Ok(BuildResult {
            output_dir,
            documents,
            drafts,
            static_files,
            overrides: overrides.len(),
        })
    }

    /// Render a single content file to an HTML fragment, without the layout.
    pub fn render_file(&self, path: &Path) -> Result<FormatOutput, BuildError> {
        let (overrides, _) = self.overrides()?;
        let highlighter = SyntaxHighlighter::new(&self.config.markdown.highlight.theme);
        let formats = FormatRegistry::for_config(&self.config);
        let ctx = FormatContext {
            highlighter: &highlighter,
            markdown_config: &self.config.markdown,
            overrides: &overrides,
        };

        let raw = std::fs::read_to_string(path)?;
        let doc = Document::parse(path.to_path_buf(), source_path_to_url(path), &raw);
        render_document(&formats, &doc, &ctx)
    }
}

fn render_document(
    formats: &FormatRegistry,
    doc: &Document,
    ctx: &FormatContext,
) -> Result<FormatOutput, BuildError> {
    let format = formats
        .for_path(&doc.source_path)
        .ok_or_else(|| BuildError::UnsupportedFormat(doc.source_path.clone()))?;
    format
        .render(&doc.body, ctx)
        .map_err(|source| BuildError::Format {
            path: doc.source_path.clone(),
            source,
        })
}

/// Visit every file below `dir`, passing its path relative to the walk root.
fn walk_directory(
    dir: &Path,
    relative_path: &Path,
    visit: &mut dyn FnMut(&Path),
) -> Result<(), BuildError> {
    let entries = std::fs::read_dir(dir).map_err(|e| BuildError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| BuildError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        let file_name = entry.file_name();

        // Skip hidden files and directories
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }

        let item_relative_path = relative_path.join(&file_name);
        if path.is_dir() {
            walk_directory(&path, &item_relative_path, visit)?;
        } else if path.is_file() {
            visit(&item_relative_path);
        }
    }

    Ok(())
}

/// Copy every file below `from` into `to`, returning the number of files copied.
fn copy_directory(from: &Path, to: &Path) -> Result<usize, BuildError> {
    let mut files = Vec::new();
    walk_directory(from, Path::new(""), &mut |relative| {
        files.push(relative.to_path_buf())
    })?;

    for relative in &files {
        let output_path = to.join(relative);
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(from.join(relative), &output_path)?;
    }

    Ok(files.len())
}
