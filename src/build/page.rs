use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::{Config, Integration};

/// Name under which the layout is registered with Tera.
const LAYOUT_TEMPLATE: &str = "page.html";

const KATEX_VERSION: &str = "0.16.9";

/// Layout used when the site does not configure one.
pub const DEFAULT_LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page.title }} | {{ site.name }}</title>
  {%- if page.description %}
  <meta name="description" content="{{ page.description }}">
  {%- endif %}
  {%- for href in assets.stylesheets %}
  <link rel="stylesheet" href="{{ href | safe }}">
  {%- endfor %}
  {%- for src in assets.scripts %}
  <script defer src="{{ src | safe }}"></script>
  {%- endfor %}
  {%- if assets.math %}
  <script>
    document.addEventListener("DOMContentLoaded", function () {
      document.querySelectorAll(".math").forEach(function (el) {
        katex.render(el.textContent, el, {
          displayMode: el.classList.contains("math-display"),
          throwOnError: false
        });
      });
    });
  </script>
  {%- endif %}
</head>
<body>
  <header><a href="{% if site.url %}{{ site.url | safe }}{% endif %}/">{{ site.name }}</a></header>
  {%- if toc | length > 1 %}
  <nav class="toc">
    <ul>
      {%- for entry in toc %}
      <li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.text }}</a></li>
      {%- endfor %}
    </ul>
  </nav>
  {%- endif %}
  <main>
{{ content | safe }}
  </main>
</body>
</html>
"##;

#[derive(thiserror::Error, Debug)]
pub enum PageError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("layout not found: {}", .0.display())]
    LayoutNotFound(PathBuf),
}

/// The page renderer, wrapping Tera.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Create a renderer for the given layout file, or the built-in layout.
    pub fn new(layout: Option<&Path>) -> Result<Self, PageError> {
        let mut tera = Tera::default();
        match layout {
            Some(path) => {
                if !path.is_file() {
                    return Err(PageError::LayoutNotFound(path.to_path_buf()));
                }
                tera.add_template_file(path, Some(LAYOUT_TEMPLATE))?;
            }
            None => tera.add_raw_template(LAYOUT_TEMPLATE, DEFAULT_LAYOUT)?,
        }
        Ok(Self { tera })
    }

    /// Render a page with the given context.
    pub fn render_page(&self, context: &PageContext) -> Result<String, PageError> {
        let mut tera_context = Context::new();
        tera_context.insert("site", &context.site);
        tera_context.insert("page", &context.page);
        tera_context.insert("content", &context.content);
        tera_context.insert("toc", &context.toc);
        tera_context.insert("assets", &context.assets);

        Ok(self.tera.render(LAYOUT_TEMPLATE, &tera_context)?)
    }
}

/// Context passed to the page layout.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub site: SiteContext,
    pub page: PageInfo,
    pub content: String,
    /// Table of contents for the current page
    pub toc: Vec<TocEntry>,
    pub assets: PageAssets,
}

/// Site-level information.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub name: String,
    pub url: Option<String>,
    /// `site.params` from the config, untouched
    pub params: serde_json::Value,
}

impl SiteContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.site.name.clone(),
            url: config
                .site
                .url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            params: config.site.params.clone(),
        }
    }
}

/// Information about the current page.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    /// Custom front matter fields (flattened to top level, e.g., `page.author`)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// A table of contents entry for the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// The heading text
    pub text: String,
    /// The heading id (for anchor links)
    pub id: String,
    /// The heading level (1-6)
    pub level: u8,
}

/// Stylesheets and scripts every page links.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageAssets {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    /// Whether math spans need rendering on the client
    pub math: bool,
}

impl PageAssets {
    pub fn for_config(config: &Config, highlight_css: bool) -> Self {
        let mut assets = Self::default();

        if config.has_integration(Integration::Tailwind) {
            assets.stylesheets.push("/tailwind.css".to_string());
        }
        if highlight_css {
            assets.stylesheets.push("/highlight.css".to_string());
        }
        if config.markdown.math {
            let cdn = format!("https://cdn.jsdelivr.net/npm/katex@{KATEX_VERSION}/dist");
            assets.stylesheets.push(format!("{cdn}/katex.min.css"));
            assets.scripts.push(format!("{cdn}/katex.min.js"));
            assets.math = true;
        }

        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(content: &str, assets: PageAssets) -> PageContext {
        PageContext {
            site: SiteContext::from_config(&Config::new("Docs")),
            page: PageInfo {
                title: "Intro".to_string(),
                url: "/intro".to_string(),
                description: Some("Start here".to_string()),
                extra: HashMap::new(),
            },
            content: content.to_string(),
            toc: vec![
                TocEntry {
                    text: "Intro".to_string(),
                    id: "intro".to_string(),
                    level: 1,
                },
                TocEntry {
                    text: "Usage".to_string(),
                    id: "usage".to_string(),
                    level: 2,
                },
            ],
            assets,
        }
    }

    #[test]
    fn test_default_layout() {
        let renderer = PageRenderer::new(None).unwrap();
        let html = renderer
            .render_page(&context("<p>Hello</p>", PageAssets::default()))
            .unwrap();

        assert!(html.contains("<title>Intro | Docs</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"Start here\">"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains("<a href=\"#usage\">Usage</a>"));
        assert!(!html.contains("katex"));
    }

    #[test]
    fn test_default_layout_is_whole_document() {
        assert!(DEFAULT_LAYOUT.starts_with("<!DOCTYPE html>"));
        assert!(DEFAULT_LAYOUT.contains("href=\"#{{ entry.id }}\""));
        assert!(DEFAULT_LAYOUT.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_assets_for_config() {
        let mut config = Config::new("Docs");
        config.integrations.push(Integration::Tailwind);
        let assets = PageAssets::for_config(&config, true);

        assert_eq!(assets.stylesheets[0], "/tailwind.css");
        assert_eq!(assets.stylesheets[1], "/highlight.css");
        assert!(assets.stylesheets[2].contains("katex@0.16.9"));
        assert_eq!(assets.scripts.len(), 1);
        assert!(assets.math);

        config.integrations.clear();
        config.markdown.math = false;
        let assets = PageAssets::for_config(&config, false);
        assert!(assets.stylesheets.is_empty());
        assert!(assets.scripts.is_empty());
        assert!(!assets.math);
    }

    #[test]
    fn test_default_layout_links_assets() {
        let mut config = Config::new("Docs");
        config.integrations.push(Integration::Tailwind);
        let renderer = PageRenderer::new(None).unwrap();
        let html = renderer
            .render_page(&context("", PageAssets::for_config(&config, true)))
            .unwrap();

        assert!(html.contains("<link rel=\"stylesheet\" href=\"/tailwind.css\">"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"/highlight.css\">"));
        assert!(html.contains("katex.min.js"));
        assert!(html.contains("katex.render"));
    }

    #[test]
    fn test_custom_layout() {
        let dir = tempfile::tempdir().unwrap();
        let layout = dir.path().join("layout.html");
        std::fs::write(
            &layout,
            "<h1>{{ page.title }}</h1>{{ content | safe }}{{ site.params.footer | default(value='') }}",
        )
        .unwrap();

        let renderer = PageRenderer::new(Some(&layout)).unwrap();
        let html = renderer
            .render_page(&context("<p>x</p>", PageAssets::default()))
            .unwrap();
        assert_eq!(html, "<h1>Intro</h1><p>x</p>");
    }

    #[test]
    fn test_missing_layout() {
        let dir = tempfile::tempdir().unwrap();
        let result = PageRenderer::new(Some(&dir.path().join("nope.html")));
        assert!(matches!(result, Err(PageError::LayoutNotFound(_))));
    }
}
