//! Components backed by Tera templates in the project's components directory.
//!
//! A template component can serve any node kind. Its render context is the
//! props struct of the kind it is registered for, so a link template sees
//! `href`, `title` and `children`. Templates ending in `.html` are autoescaped
//! by Tera, which means already-rendered HTML must be emitted with
//! `{{ children | safe }}`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};

use super::ComponentError;
use crate::registry::{
    CodeBlockComponent, CodeBlockProps, HeadingComponent, HeadingProps, ImageComponent,
    ImageProps, InlineCodeComponent, InlineCodeProps, LinkComponent, LinkProps, NodeKind,
    RenderError, RenderUnit, StrongComponent, StrongProps,
};

/// All component templates of a project, parsed once.
pub struct ComponentLibrary {
    tera: Arc<Tera>,
    dir: PathBuf,
}

impl ComponentLibrary {
    /// Load every `*.html` template below `dir`.
    ///
    /// A missing directory yields an empty library; lookups then fail with
    /// [`ComponentError::NotFound`].
    pub fn load(dir: &Path) -> Result<Self, ComponentError> {
        let tera = if dir.is_dir() {
            let glob = dir.join("**/*.html");
            let glob_str = glob.to_string_lossy();
            Tera::new(&glob_str).map_err(|source| ComponentError::Load {
                path: dir.to_path_buf(),
                source,
            })?
        } else {
            tracing::debug!(dir = %dir.display(), "components directory does not exist");
            Tera::default()
        };

        Ok(Self {
            tera: Arc::new(tera),
            dir: dir.to_path_buf(),
        })
    }

    /// Build a library from in-memory templates, keyed by template name.
    #[cfg(test)]
    pub fn from_templates(templates: &[(&str, &str)]) -> Result<Self, ComponentError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied())
            .map_err(|source| ComponentError::Load {
                path: PathBuf::from("<memory>"),
                source,
            })?;
        Ok(Self {
            tera: Arc::new(tera),
            dir: PathBuf::from("<memory>"),
        })
    }

    /// Resolve a component name to a render unit for `kind`.
    pub fn resolve(&self, name: &str, kind: NodeKind) -> Result<RenderUnit, ComponentError> {
        let template = template_name(name);
        if !self.tera.get_template_names().any(|n| n == template) {
            return Err(ComponentError::NotFound {
                name: name.to_string(),
                path: self.dir.join(&template),
            });
        }

        let component = TemplateComponent {
            tera: Arc::clone(&self.tera),
            template,
        };

        Ok(match kind {
            NodeKind::Heading(_) => RenderUnit::heading(component),
            NodeKind::Link => RenderUnit::link(component),
            NodeKind::Image => RenderUnit::image(component),
            NodeKind::CodeBlock => RenderUnit::code_block(component),
            NodeKind::InlineCode => RenderUnit::inline_code(component),
            NodeKind::Strong => RenderUnit::strong(component),
        })
    }

    /// Names of all loaded templates.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tera
            .get_template_names()
            .map(|n| n.to_string())
            .collect();
        names.sort();
        names
    }
}

/// Template file name for a component name: `Heading2` -> `Heading2.html`.
fn template_name(name: &str) -> String {
    if name.ends_with(".html") {
        name.to_string()
    } else {
        format!("{name}.html")
    }
}

/// A component rendered by a single Tera template.
pub struct TemplateComponent {
    tera: Arc<Tera>,
    template: String,
}

impl TemplateComponent {
    fn render_props<P: Serialize>(&self, props: &P) -> Result<String, RenderError> {
        let context = Context::from_serialize(props).map_err(|source| self.error(source))?;
        self.tera
            .render(&self.template, &context)
            .map_err(|source| self.error(source))
    }

    fn error(&self, source: tera::Error) -> RenderError {
        RenderError::Template {
            component: self.template.clone(),
            source,
        }
    }
}

impl HeadingComponent for TemplateComponent {
    fn render(&self, props: &HeadingProps) -> Result<String, RenderError> {
        self.render_props(props)
    }
}

impl LinkComponent for TemplateComponent {
    fn render(&self, props: &LinkProps) -> Result<String, RenderError> {
        self.render_props(props)
    }
}

impl ImageComponent for TemplateComponent {
    fn render(&self, props: &ImageProps) -> Result<String, RenderError> {
        self.render_props(props)
    }
}

impl CodeBlockComponent for TemplateComponent {
    fn render(&self, props: &CodeBlockProps) -> Result<String, RenderError> {
        self.render_props(props)
    }
}

impl InlineCodeComponent for TemplateComponent {
    fn render(&self, props: &InlineCodeProps) -> Result<String, RenderError> {
        self.render_props(props)
    }
}

impl StrongComponent for TemplateComponent {
    fn render(&self, props: &StrongProps) -> Result<String, RenderError> {
        self.render_props(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Capability;

    #[test]
    fn test_template_name() {
        assert_eq!(template_name("Heading2"), "Heading2.html");
        assert_eq!(template_name("pre.html"), "pre.html");
    }

    #[test]
    fn test_resolve_matches_kind_capability() {
        let library =
            ComponentLibrary::from_templates(&[("Link.html", "<a href=\"{{ href }}\">x</a>")])
                .unwrap();

        let unit = library.resolve("Link", NodeKind::Link).unwrap();
        assert_eq!(unit.capability(), Capability::Link);

        let unit = library.resolve("Link", NodeKind::Heading(2)).unwrap();
        assert_eq!(unit.capability(), Capability::Heading);
    }

    #[test]
    fn test_resolve_missing_template() {
        let library = ComponentLibrary::from_templates(&[]).unwrap();
        let err = library.resolve("Heading2", NodeKind::Heading(2)).unwrap_err();
        assert!(matches!(err, ComponentError::NotFound { ref name, .. } if name == "Heading2"));
    }

    #[test]
    fn test_link_template_renders_props() {
        let library = ComponentLibrary::from_templates(&[(
            "Link.html",
            "<a class=\"link\" href=\"{{ href }}\">{{ children | safe }}</a>",
        )])
        .unwrap();

        let unit = library.resolve("Link", NodeKind::Link).unwrap();
        let RenderUnit::Link(link) = unit else {
            panic!("expected a link unit");
        };
        let html = link
            .render(&LinkProps {
                href: "docs?x=1&y=2".to_string(),
                title: String::new(),
                children: "<em>docs</em>".to_string(),
            })
            .unwrap();

        assert_eq!(
            html,
            "<a class=\"link\" href=\"docs?x=1&amp;y=2\"><em>docs</em></a>"
        );
    }

    #[test]
    fn test_heading_template_sees_level_and_id() {
        let library = ComponentLibrary::from_templates(&[(
            "Heading2.html",
            "<h{{ level }} id=\"{{ id }}\" class=\"text-2xl\">{{ children | safe }}</h{{ level }}>",
        )])
        .unwrap();

        let RenderUnit::Heading(heading) = library.resolve("Heading2", NodeKind::Heading(2)).unwrap()
        else {
            panic!("expected a heading unit");
        };
        let html = heading
            .render(&HeadingProps {
                level: 2,
                id: "install".to_string(),
                text: "Install".to_string(),
                children: "Install".to_string(),
            })
            .unwrap();
        assert_eq!(html, "<h2 id=\"install\" class=\"text-2xl\">Install</h2>");
    }

    #[test]
    fn test_template_error_is_reported() {
        let library =
            ComponentLibrary::from_templates(&[("Broken.html", "{{ missing_variable }}")]).unwrap();

        let RenderUnit::Strong(strong) = library.resolve("Broken", NodeKind::Strong).unwrap() else {
            panic!("expected a strong unit");
        };
        let err = strong
            .render(&StrongProps {
                children: "x".to_string(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("Broken.html"));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Strong.html"), "<b>{{ children | safe }}</b>").unwrap();
        std::fs::create_dir(dir.path().join("replace")).unwrap();
        std::fs::write(dir.path().join("replace/pre.html"), "{{ highlighted | safe }}").unwrap();

        let library = ComponentLibrary::load(dir.path()).unwrap();
        assert_eq!(
            library.template_names(),
            vec!["Strong.html".to_string(), "replace/pre.html".to_string()]
        );
        assert!(library.resolve("replace/pre", NodeKind::CodeBlock).is_ok());
    }

    #[test]
    fn test_load_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let library = ComponentLibrary::load(&dir.path().join("nope")).unwrap();
        assert!(library.template_names().is_empty());
    }
}
