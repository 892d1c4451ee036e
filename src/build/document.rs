use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::page::TocEntry;

/// A content document discovered under the content directory.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the content root (e.g., "guides/installation.md")
    pub source_path: PathBuf,
    /// The URL path this document will be served at (e.g., "/guides/installation")
    pub url_path: String,
    /// Front matter metadata
    pub front_matter: FrontMatter,
    /// The document body without the front matter block
    pub body: String,
}

/// Front matter metadata parsed from the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Page title (overrides the heading and filename-derived title)
    pub title: Option<String>,
    /// Page description for SEO/previews
    pub description: Option<String>,
    /// Drafts are not built
    #[serde(default)]
    pub draft: bool,
    /// Additional arbitrary metadata (available in templates at top level, e.g., `page.author`)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Result of parsing front matter from markdown content.
#[derive(Debug)]
pub struct ParsedContent {
    /// The parsed front matter (empty if none found)
    pub front_matter: FrontMatter,
    /// The markdown content without the front matter block
    pub content: String,
}

/// Parse front matter from markdown content.
///
/// Front matter is a YAML block delimited by `---` at the start of the file:
///
/// ```markdown
/// ---
/// title: My Page
/// description: A description
/// draft: true
/// ---
///
/// # Content starts here
/// ```
///
/// Returns the parsed front matter and the remaining content.
pub fn parse_front_matter(content: &str) -> ParsedContent {
    let content = content.trim_start();

    if !content.starts_with("---") {
        return ParsedContent {
            front_matter: FrontMatter::default(),
            content: content.to_string(),
        };
    }

    // Find the closing delimiter
    let after_opening = &content[3..];
    let Some(closing_pos) = after_opening.find("\n---") else {
        // No closing delimiter found, treat entire content as markdown
        return ParsedContent {
            front_matter: FrontMatter::default(),
            content: content.to_string(),
        };
    };

    let yaml_content = after_opening[..closing_pos].trim_start_matches('\n');

    // Skip "---" + yaml + "\n---"
    let markdown_start = 3 + closing_pos + 4;
    let markdown_content = if markdown_start < content.len() {
        content[markdown_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    let front_matter = if yaml_content.trim().is_empty() {
        FrontMatter::default()
    } else {
        match serde_yaml::from_str(yaml_content) {
            Ok(fm) => fm,
            Err(e) => {
                tracing::warn!("failed to parse front matter: {}", e);
                FrontMatter::default()
            }
        }
    };

    ParsedContent {
        front_matter,
        content: markdown_content,
    }
}

impl Document {
    /// Create a document from its raw file content.
    pub fn parse(source_path: PathBuf, url_path: String, raw: &str) -> Self {
        let parsed = parse_front_matter(raw);
        Self {
            source_path,
            url_path,
            front_matter: parsed.front_matter,
            body: parsed.content,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.front_matter.draft
    }

    /// Get the document title.
    ///
    /// Front matter wins, then the first heading of the rendered document,
    /// then the file name.
    pub fn title(&self, toc: &[TocEntry]) -> String {
        if let Some(title) = &self.front_matter.title {
            return title.clone();
        }
        if let Some(first) = toc.first() {
            return first.text.clone();
        }
        self.source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(title_case)
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

/// Convert a filename slug to title case.
/// "getting-started" -> "Getting Started"
/// "installation" -> "Installation"
pub fn title_case(s: &str) -> String {
    s.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, raw: &str) -> Document {
        Document::parse(PathBuf::from(path), "/x".to_string(), raw)
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("getting-started"), "Getting Started");
        assert_eq!(title_case("installation"), "Installation");
        assert_eq!(title_case("api_reference"), "Api Reference");
        assert_eq!(title_case("README"), "README");
    }

    #[test]
    fn test_document_title_fallback() {
        let doc = doc("getting-started/installation.md", "Text only");
        assert_eq!(doc.title(&[]), "Installation");
    }

    #[test]
    fn test_document_title_from_heading() {
        let doc = doc("intro.md", "# Welcome");
        let toc = vec![TocEntry {
            text: "Welcome".to_string(),
            id: "welcome".to_string(),
            level: 1,
        }];
        assert_eq!(doc.title(&toc), "Welcome");
    }

    #[test]
    fn test_document_title_from_front_matter() {
        let doc = doc("intro.md", "---\ntitle: Welcome to the site\n---\n# Other");
        let toc = vec![TocEntry {
            text: "Other".to_string(),
            id: "other".to_string(),
            level: 1,
        }];
        assert_eq!(doc.title(&toc), "Welcome to the site");
    }

    #[test]
    fn test_parse_front_matter_basic() {
        let content = r#"---
title: My Page
description: A test page
---

# Hello World
"#;
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, Some("My Page".to_string()));
        assert_eq!(parsed.front_matter.description, Some("A test page".to_string()));
        assert!(!parsed.front_matter.draft);
        assert_eq!(parsed.content.trim(), "# Hello World");
    }

    #[test]
    fn test_parse_front_matter_with_custom_fields() {
        let content = r#"---
title: Custom Page
author: Jane Doe
tags:
  - rust
  - documentation
---

Content here
"#;
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, Some("Custom Page".to_string()));
        assert!(parsed.front_matter.extra.contains_key("author"));
        assert!(parsed.front_matter.extra.contains_key("tags"));
    }

    #[test]
    fn test_parse_front_matter_draft() {
        let doc = doc("wip.md", "---\ndraft: true\n---\nSoon");
        assert!(doc.is_draft());
        assert_eq!(doc.body, "Soon");
    }

    #[test]
    fn test_parse_front_matter_no_front_matter() {
        let content = "# Just Markdown\n\nNo front matter here.";
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.content.starts_with("# Just Markdown"));
    }

    #[test]
    fn test_parse_front_matter_empty_front_matter() {
        let content = "---\n---\n\n# Content";
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.content.starts_with("# Content"));
    }

    #[test]
    fn test_parse_front_matter_malformed_is_ignored() {
        let parsed = parse_front_matter("---\ntitle: [unclosed\n---\nBody");
        assert_eq!(parsed.front_matter.title, None);
        assert_eq!(parsed.content, "Body");
    }
}
