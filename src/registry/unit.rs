//! Render units and the capability traits they implement.
//!
//! Each node category has its own trait with its own props type, so a
//! component written for links cannot accidentally be handed image data.
//! Props are `Serialize` so template-backed components can use them directly
//! as their render context.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::kind::Capability;

/// Failure inside a render unit.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error in component '{component}': {source}")]
    Template {
        component: String,
        source: tera::Error,
    },

    #[error("component '{component}' failed: {message}")]
    Component { component: String, message: String },
}

/// Props passed to heading components.
#[derive(Debug, Clone, Serialize)]
pub struct HeadingProps {
    /// Heading level (1-6)
    pub level: u8,
    /// Unique anchor id for the heading
    pub id: String,
    /// Plain text of the heading
    pub text: String,
    /// Rendered HTML of the heading content
    pub children: String,
}

/// Props passed to link components.
#[derive(Debug, Clone, Serialize)]
pub struct LinkProps {
    pub href: String,
    pub title: String,
    /// Rendered HTML of the link text
    pub children: String,
}

/// Props passed to image components.
#[derive(Debug, Clone, Serialize)]
pub struct ImageProps {
    pub src: String,
    pub alt: String,
    pub title: String,
}

/// Props passed to code block components.
#[derive(Debug, Clone, Serialize)]
pub struct CodeBlockProps {
    /// Language from the fence info string (empty for indented blocks)
    pub lang: String,
    /// Raw, unescaped source code
    pub code: String,
    /// Output of the syntax highlighter for this block
    pub highlighted: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineCodeProps {
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrongProps {
    pub children: String,
}

pub trait HeadingComponent: Send + Sync {
    fn render(&self, props: &HeadingProps) -> Result<String, RenderError>;
}

pub trait LinkComponent: Send + Sync {
    fn render(&self, props: &LinkProps) -> Result<String, RenderError>;
}

pub trait ImageComponent: Send + Sync {
    fn render(&self, props: &ImageProps) -> Result<String, RenderError>;
}

pub trait CodeBlockComponent: Send + Sync {
    fn render(&self, props: &CodeBlockProps) -> Result<String, RenderError>;
}

pub trait InlineCodeComponent: Send + Sync {
    fn render(&self, props: &InlineCodeProps) -> Result<String, RenderError>;
}

pub trait StrongComponent: Send + Sync {
    fn render(&self, props: &StrongProps) -> Result<String, RenderError>;
}

/// A renderer for one capability category.
///
/// Cloning is cheap; clones share the same component.
#[derive(Clone)]
pub enum RenderUnit {
    Heading(Arc<dyn HeadingComponent>),
    Link(Arc<dyn LinkComponent>),
    Image(Arc<dyn ImageComponent>),
    CodeBlock(Arc<dyn CodeBlockComponent>),
    InlineCode(Arc<dyn InlineCodeComponent>),
    Strong(Arc<dyn StrongComponent>),
}

impl RenderUnit {
    pub fn heading(component: impl HeadingComponent + 'static) -> Self {
        RenderUnit::Heading(Arc::new(component))
    }

    pub fn link(component: impl LinkComponent + 'static) -> Self {
        RenderUnit::Link(Arc::new(component))
    }

    pub fn image(component: impl ImageComponent + 'static) -> Self {
        RenderUnit::Image(Arc::new(component))
    }

    pub fn code_block(component: impl CodeBlockComponent + 'static) -> Self {
        RenderUnit::CodeBlock(Arc::new(component))
    }

    pub fn inline_code(component: impl InlineCodeComponent + 'static) -> Self {
        RenderUnit::InlineCode(Arc::new(component))
    }

    pub fn strong(component: impl StrongComponent + 'static) -> Self {
        RenderUnit::Strong(Arc::new(component))
    }

    /// The capability this unit provides.
    pub fn capability(&self) -> Capability {
        match self {
            RenderUnit::Heading(_) => Capability::Heading,
            RenderUnit::Link(_) => Capability::Link,
            RenderUnit::Image(_) => Capability::Image,
            RenderUnit::CodeBlock(_) => Capability::CodeBlock,
            RenderUnit::InlineCode(_) => Capability::InlineCode,
            RenderUnit::Strong(_) => Capability::Strong,
        }
    }

    /// Returns true if both units wrap the same component instance.
    pub fn same_as(&self, other: &RenderUnit) -> bool {
        match (self, other) {
            (RenderUnit::Heading(a), RenderUnit::Heading(b)) => Arc::ptr_eq(a, b),
            (RenderUnit::Link(a), RenderUnit::Link(b)) => Arc::ptr_eq(a, b),
            (RenderUnit::Image(a), RenderUnit::Image(b)) => Arc::ptr_eq(a, b),
            (RenderUnit::CodeBlock(a), RenderUnit::CodeBlock(b)) => Arc::ptr_eq(a, b),
            (RenderUnit::InlineCode(a), RenderUnit::InlineCode(b)) => Arc::ptr_eq(a, b),
            (RenderUnit::Strong(a), RenderUnit::Strong(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for RenderUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderUnit({})", self.capability())
    }
}
