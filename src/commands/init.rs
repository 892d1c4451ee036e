use std::path::{Path, PathBuf};

use mdreplace::config::{Config, DEFAULT_CONFIG_FILE, Integration, ReplaceEntry};

use crate::InitArgs;

/// Starter replace table: node kind, component name.
const REPLACE_TABLE: [(&str, &str); 6] = [
    ("a", "Link"),
    ("h2", "Heading2"),
    ("h3", "Heading3"),
    ("img", "img"),
    ("pre", "pre"),
    ("strong", "Strong"),
];

/// Starter component templates, styled with Tailwind utility classes.
const COMPONENT_TEMPLATES: [(&str, &str); 6] = [
    (
        "Link.html",
        r#"<a href="{{ href }}" class="text-sky-700 underline-offset-4 hover:underline"{% if title %} title="{{ title }}"{% endif %}>{{ children | safe }}</a>"#,
    ),
    (
        "Heading2.html",
        r#"<h2 id="{{ id }}" class="mt-12 mb-4 scroll-mt-20 text-2xl font-bold tracking-tight">{{ children | safe }}</h2>"#,
    ),
    (
        "Heading3.html",
        r#"<h3 id="{{ id }}" class="mt-8 mb-3 scroll-mt-20 text-xl font-semibold">{{ children | safe }}</h3>"#,
    ),
    (
        "img.html",
        r#"<img src="{{ src }}" alt="{{ alt }}"{% if title %} title="{{ title }}"{% endif %} class="mx-auto my-6 rounded-lg shadow" loading="lazy">"#,
    ),
    (
        "pre.html",
        r#"<div class="my-6 overflow-x-auto rounded-lg border border-slate-200 text-sm"{% if lang %} data-lang="{{ lang }}"{% endif %}>{{ highlighted | safe }}</div>"#,
    ),
    (
        "Strong.html",
        r#"<strong class="font-semibold text-slate-900">{{ children | safe }}</strong>"#,
    ),
];

const STARTER_PAGE: &str = r#"---
title: Welcome
---

# Welcome

This page is rendered with the components in `components/`.

## Links and emphasis

Read the [configuration](https://example.com "Configuration") and **bold** text.

## Code

```rust
fn main() {
    println!("hello");
}
```

### Math

Inline math like $e^{i\pi} + 1 = 0$ is rendered with KaTeX.
"#;

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    println!("Initializing project in {}", path.display());

    for file in write_project(&path).await? {
        println!("Created {}", file.display());
    }

    Ok(())
}

fn default_config() -> Config {
    let mut config = Config::new("My Site");
    config.site.url = Some("https://example.com".into());
    config.integrations = vec![Integration::Tailwind, Integration::Mdx];
    config.components.replace = REPLACE_TABLE
        .iter()
        .map(|(kind, component)| ReplaceEntry::new(*kind, *component))
        .collect();
    config
}

/// Write the config file, component templates and a starter page.
async fn write_project(path: &Path) -> Result<Vec<PathBuf>, anyhow::Error> {
    let config_file = path.join(DEFAULT_CONFIG_FILE);
    if config_file.exists() {
        return Err(anyhow::anyhow!(
            "Config file already exists: {}",
            config_file.display()
        ));
    }

    let config = default_config();
    let mut created = Vec::new();

    let config_text = serde_yaml::to_string(&config)?;
    tokio::fs::write(&config_file, config_text).await?;
    created.push(config_file);

    let components_dir = config.components_dir(path);
    tokio::fs::create_dir_all(&components_dir).await?;
    for (name, template) in COMPONENT_TEMPLATES {
        let file = components_dir.join(name);
        if !file.exists() {
            tokio::fs::write(&file, format!("{template}\n")).await?;
            created.push(file);
        }
    }

    let content_dir = config.content_dir(path);
    tokio::fs::create_dir_all(&content_dir).await?;
    let index = content_dir.join("index.md");
    if !index.exists() {
        tokio::fs::write(&index, STARTER_PAGE).await?;
        created.push(index);
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdreplace::build::Builder;

    #[test]
    fn test_default_config_replace_table() {
        let config = default_config();
        let pairs: Vec<(&str, &str)> = config
            .components
            .replace
            .iter()
            .filter_map(|entry| entry.pair())
            .collect();
        assert_eq!(pairs, REPLACE_TABLE.to_vec());
    }

    #[tokio::test]
    async fn test_init_project_builds() {
        let dir = tempfile::tempdir().unwrap();
        let created = write_project(dir.path()).await.unwrap();
        assert_eq!(created.len(), 8);

        let config_path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = Config::load_from_arg(Some(config_path.as_path()))
            .await
            .unwrap();
        assert!(config.has_integration(Integration::Tailwind));
        assert_eq!(config.components.replace.len(), 6);

        let builder = Builder::new(config, dir.path().to_path_buf());
        let result = builder.build().await.unwrap();
        assert_eq!(result.documents, 1);
        assert_eq!(result.overrides, 6);

        let html = std::fs::read_to_string(dir.path().join("_site/index.html")).unwrap();
        assert!(html.contains("<h2 id=\"links-and-emphasis\" class=\"mt-12"));
        assert!(html.contains("<strong class=\"font-semibold text-slate-900\">bold</strong>"));
        assert!(html.contains("data-lang=\"rust\""));
        assert!(html.contains("href=\"/tailwind.css\""));
        assert!(html.contains("math math-inline"));
    }

    #[tokio::test]
    async fn test_init_refuses_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path()).await.unwrap();
        assert!(write_project(dir.path()).await.is_err());
    }
}
