//! Built-in components, addressable as `builtin:<name>` in the replace table.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::registry::{
    CodeBlockComponent, CodeBlockProps, HeadingComponent, HeadingProps, ImageComponent,
    ImageProps, InlineCodeComponent, InlineCodeProps, LinkComponent, LinkProps, RenderError,
    RenderUnit, StrongComponent, StrongProps,
};

/// Prefix that selects a built-in component instead of a template.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Names of all built-in components.
pub const BUILTIN_NAMES: [&str; 6] = ["heading", "link", "image", "pre", "code", "strong"];

/// Look up a built-in component by name (without the prefix).
pub fn builtin(name: &str) -> Option<RenderUnit> {
    let unit = match name {
        "heading" => RenderUnit::heading(AnchorHeading),
        "link" => RenderUnit::link(SmartLink),
        "image" => RenderUnit::image(FigureImage),
        "pre" => RenderUnit::code_block(CodeFrame),
        "code" => RenderUnit::inline_code(InlineCode),
        "strong" => RenderUnit::strong(Strong),
        _ => return None,
    };
    Some(unit)
}

/// Heading with an id and a trailing permalink anchor.
pub struct AnchorHeading;

impl HeadingComponent for AnchorHeading {
    fn render(&self, props: &HeadingProps) -> Result<String, RenderError> {
        let id = encode_double_quoted_attribute(&props.id);
        Ok(format!(
            "<h{level} id=\"{id}\" class=\"group\">{children} <a class=\"header-anchor\" href=\"#{id}\" aria-label=\"Link to this heading\">#</a></h{level}>\n",
            level = props.level,
            children = props.children,
        ))
    }
}

/// Link that opens external targets in a new tab.
pub struct SmartLink;

impl SmartLink {
    fn is_external(href: &str) -> bool {
        href.starts_with("http://") || href.starts_with("https://") || href.starts_with("//")
    }
}

impl LinkComponent for SmartLink {
    fn render(&self, props: &LinkProps) -> Result<String, RenderError> {
        let mut html = format!("<a href=\"{}\"", encode_double_quoted_attribute(&props.href));
        if !props.title.is_empty() {
            html.push_str(&format!(
                " title=\"{}\"",
                encode_double_quoted_attribute(&props.title)
            ));
        }
        if Self::is_external(&props.href) {
            html.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
        }
        html.push('>');
        html.push_str(&props.children);
        html.push_str("</a>");
        Ok(html)
    }
}

/// Image wrapped in a figure, captioned by its title.
pub struct FigureImage;

impl ImageComponent for FigureImage {
    fn render(&self, props: &ImageProps) -> Result<String, RenderError> {
        let img = format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\" decoding=\"async\">",
            encode_double_quoted_attribute(&props.src),
            encode_double_quoted_attribute(&props.alt),
        );
        if props.title.is_empty() {
            return Ok(format!("<figure>{img}</figure>"));
        }
        Ok(format!(
            "<figure>{img}<figcaption>{}</figcaption></figure>",
            encode_text(&props.title)
        ))
    }
}

/// Frame around highlighted code carrying the language as a data attribute.
pub struct CodeFrame;

impl CodeBlockComponent for CodeFrame {
    fn render(&self, props: &CodeBlockProps) -> Result<String, RenderError> {
        if props.lang.is_empty() {
            return Ok(format!(
                "<div class=\"code-block\">{}</div>\n",
                props.highlighted
            ));
        }
        Ok(format!(
            "<div class=\"code-block\" data-lang=\"{}\">{}</div>\n",
            encode_double_quoted_attribute(&props.lang),
            props.highlighted
        ))
    }
}

pub struct InlineCode;

impl InlineCodeComponent for InlineCode {
    fn render(&self, props: &InlineCodeProps) -> Result<String, RenderError> {
        Ok(format!(
            "<code class=\"inline-code\">{}</code>",
            encode_text(&props.code)
        ))
    }
}

pub struct Strong;

impl StrongComponent for Strong {
    fn render(&self, props: &StrongProps) -> Result<String, RenderError> {
        Ok(format!(
            "<strong class=\"font-semibold\">{}</strong>",
            props.children
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Capability;

    #[test]
    fn test_every_builtin_resolves() {
        for name in BUILTIN_NAMES {
            assert!(builtin(name).is_some(), "missing builtin {name}");
        }
        assert!(builtin("marquee").is_none());
    }

    #[test]
    fn test_builtin_capabilities() {
        assert_eq!(builtin("heading").unwrap().capability(), Capability::Heading);
        assert_eq!(builtin("pre").unwrap().capability(), Capability::CodeBlock);
        assert_eq!(builtin("code").unwrap().capability(), Capability::InlineCode);
    }

    #[test]
    fn test_anchor_heading() {
        let html = AnchorHeading
            .render(&HeadingProps {
                level: 2,
                id: "setup".to_string(),
                text: "Setup".to_string(),
                children: "Setup".to_string(),
            })
            .unwrap();
        assert!(html.starts_with("<h2 id=\"setup\""));
        assert!(html.contains("href=\"#setup\""));
        assert!(html.trim_end().ends_with("</h2>"));
    }

    #[test]
    fn test_smart_link_external() {
        let html = SmartLink
            .render(&LinkProps {
                href: "https://example.com/?a=1&b=2".to_string(),
                title: String::new(),
                children: "<em>site</em>".to_string(),
            })
            .unwrap();
        assert_eq!(
            html,
            "<a href=\"https://example.com/?a=1&amp;b=2\" target=\"_blank\" rel=\"noopener noreferrer\"><em>site</em></a>"
        );
    }

    #[test]
    fn test_smart_link_internal() {
        let html = SmartLink
            .render(&LinkProps {
                href: "/guide".to_string(),
                title: "Guide".to_string(),
                children: "guide".to_string(),
            })
            .unwrap();
        assert_eq!(html, "<a href=\"/guide\" title=\"Guide\">guide</a>");
    }

    #[test]
    fn test_figure_image() {
        let props = ImageProps {
            src: "/cat.png".to_string(),
            alt: "A \"cat\"".to_string(),
            title: "My <cat>".to_string(),
        };
        let html = FigureImage.render(&props).unwrap();
        assert!(html.contains("alt=\"A &quot;cat&quot;\""));
        assert!(html.contains("<figcaption>My &lt;cat&gt;</figcaption>"));

        let untitled = ImageProps {
            title: String::new(),
            ..props
        };
        assert!(!FigureImage.render(&untitled).unwrap().contains("figcaption"));
    }

    #[test]
    fn test_code_frame() {
        let html = CodeFrame
            .render(&CodeBlockProps {
                lang: "rust".to_string(),
                code: "fn main() {}".to_string(),
                highlighted: "<pre>hl</pre>".to_string(),
            })
            .unwrap();
        assert_eq!(
            html,
            "<div class=\"code-block\" data-lang=\"rust\"><pre>hl</pre></div>\n"
        );
    }

    #[test]
    fn test_inline_code_escapes() {
        let html = InlineCode
            .render(&InlineCodeProps {
                code: "a < b".to_string(),
            })
            .unwrap();
        assert_eq!(html, "<code class=\"inline-code\">a &lt; b</code>");
    }
}
