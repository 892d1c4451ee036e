//! Pluggable content format system.
//!
//! This module provides a registry of content formats that can render
//! different file types to HTML. Markdown is always available; MDX files
//! are added by the `mdx` integration.
//!
//! # Adding a New Format
//!
//! ```ignore
//! struct TextFormat;
//!
//! impl ContentFormat for TextFormat {
//!     fn name(&self) -> &'static str { "text" }
//!     fn extensions(&self) -> &[&'static str] { &["txt"] }
//!     fn render(&self, content: &str, ctx: &FormatContext) -> Result<FormatOutput, FormatError> {
//!         // Convert plain text to HTML...
//!     }
//! }
//!
//! registry.register(TextFormat);
//! ```

use std::path::Path;

use crate::build::highlight::SyntaxHighlighter;
use crate::build::markdown::{MarkdownError, render_markdown};
use crate::build::page::TocEntry;
use crate::config::{Config, Integration, MarkdownConfig};
use crate::registry::Overrides;

/// Output from rendering a content format.
#[derive(Debug, Clone)]
pub struct FormatOutput {
    /// The rendered HTML content.
    pub html: String,
    /// Table of contents extracted from headings.
    pub toc: Vec<TocEntry>,
}

/// Context available during format rendering.
pub struct FormatContext<'a> {
    /// Syntax highlighter for code blocks.
    pub highlighter: &'a SyntaxHighlighter,
    /// Markdown-specific configuration (also used by MDX).
    pub markdown_config: &'a MarkdownConfig,
    /// Render overrides of the current build.
    pub overrides: &'a Overrides,
}

/// Error during format rendering.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("markdown error: {0}")]
    Markdown(#[from] MarkdownError),
}

/// A content format that can render files to HTML.
pub trait ContentFormat: Send + Sync {
    /// The name of this format (e.g., "markdown", "mdx").
    fn name(&self) -> &'static str;

    /// File extensions this format handles (lowercase, without dot).
    fn extensions(&self) -> &[&'static str];

    /// Render content to HTML.
    ///
    /// Returns the HTML output and extracted table of contents.
    fn render(&self, content: &str, ctx: &FormatContext) -> Result<FormatOutput, FormatError>;
}

/// Markdown format implementation.
///
/// Uses pulldown-cmark for parsing and the syntax highlighter for code blocks.
pub struct MarkdownFormat;

impl ContentFormat for MarkdownFormat {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extensions(&self) -> &[&'static str] {
        &["md", "markdown"]
    }

    fn render(&self, content: &str, ctx: &FormatContext) -> Result<FormatOutput, FormatError> {
        let output = render_markdown(
            content,
            ctx.highlighter,
            ctx.markdown_config,
            ctx.overrides,
        )?;
        Ok(FormatOutput {
            html: output.html,
            toc: output.toc,
        })
    }
}

/// MDX format: markdown with top-level ESM statements.
///
/// `import`/`export` lines are dropped and the remainder renders as markdown.
/// JSX elements are left to the markdown parser, which passes them through as
/// raw HTML.
pub struct MdxFormat;

impl ContentFormat for MdxFormat {
    fn name(&self) -> &'static str {
        "mdx"
    }

    fn extensions(&self) -> &[&'static str] {
        &["mdx"]
    }

    fn render(&self, content: &str, ctx: &FormatContext) -> Result<FormatOutput, FormatError> {
        MarkdownFormat.render(&strip_esm(content), ctx)
    }
}

/// Remove top-level `import`/`export` statements outside fenced code blocks.
///
/// A statement may span several lines; it ends once its brackets are
/// balanced and the line does not end in `from`, `=` or `,`. A blank line
/// always ends it.
fn strip_esm(content: &str) -> String {
    let mut fence: Option<&str> = None;
    let mut in_statement = false;
    let mut depth: i32 = 0;
    let mut output = String::with_capacity(content.len());

    for line in content.lines() {
        let trimmed = line.trim_start();

        if in_statement {
            if trimmed.is_empty() {
                in_statement = false;
            } else {
                depth += bracket_delta(line);
                in_statement = !statement_complete(line, depth);
                continue;
            }
        }

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
        } else if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        } else if line.starts_with("import ") || line.starts_with("export ") {
            depth = bracket_delta(line);
            in_statement = !statement_complete(line, depth);
            continue;
        }

        output.push_str(line);
        output.push('\n');
    }

    output
}

fn bracket_delta(line: &str) -> i32 {
    line.chars()
        .map(|c| match c {
            '{' | '(' | '[' => 1,
            '}' | ')' | ']' => -1,
            _ => 0,
        })
        .sum()
}

fn statement_complete(line: &str, depth: i32) -> bool {
    let line = line.trim_end();
    depth <= 0 && !line.ends_with(" from") && !line.ends_with('=') && !line.ends_with(',')
}

/// Registry of content formats.
///
/// The registry determines which format to use based on file extension
/// and provides access to format implementations for rendering.
pub struct FormatRegistry {
    formats: Vec<Box<dyn ContentFormat>>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Create a registry with the default formats (Markdown).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownFormat);
        registry
    }

    /// Create a registry with the formats enabled by the site configuration.
    pub fn for_config(config: &Config) -> Self {
        let mut registry = Self::with_defaults();
        if config.has_integration(Integration::Mdx) {
            registry.register(MdxFormat);
        }
        registry
    }

    /// Register a new format.
    ///
    /// Later registrations take precedence for overlapping extensions.
    pub fn register<F: ContentFormat + 'static>(&mut self, format: F) {
        self.formats.push(Box::new(format));
    }

    /// Find the format for a file extension.
    ///
    /// Returns `None` if no format handles this extension.
    pub fn for_extension(&self, ext: &str) -> Option<&dyn ContentFormat> {
        let ext_lower = ext.to_lowercase();
        // Search in reverse so later registrations take precedence
        self.formats
            .iter()
            .rev()
            .find(|f| f.extensions().iter().any(|e| *e == ext_lower))
            .map(|f| f.as_ref())
    }

    /// Find the format for a file path based on its extension.
    pub fn for_path(&self, path: &Path) -> Option<&dyn ContentFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.for_extension(ext))
    }

    /// Check if a path is a document (has a registered format).
    pub fn is_document(&self, path: &Path) -> bool {
        self.for_path(path).is_some()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
