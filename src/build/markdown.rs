//! Markdown rendering with syntax highlighting, TOC extraction and component overrides.
//!
//! Every overridable node is checked against the [`Overrides`] of the build.
//! Nodes with an override are captured (their inner events rendered to HTML
//! first) and handed to the component; everything else goes through the
//! default rendering below or pulldown-cmark's own HTML writer.

use std::collections::{HashMap, HashSet};

use html_escape::{encode_double_quoted_attribute, encode_text};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use super::highlight::SyntaxHighlighter;
use super::page::TocEntry;
use crate::config::MarkdownConfig;
use crate::registry::{
    CodeBlockProps, HeadingProps, ImageComponent, ImageProps, InlineCodeProps, LinkComponent,
    LinkProps, NodeKind, Overrides, RenderError, StrongComponent, StrongProps,
};

#[derive(thiserror::Error, Debug)]
pub enum MarkdownError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),

    #[error("override for <{kind}> failed: {source}")]
    Component { kind: NodeKind, source: RenderError },
}

/// Result of rendering markdown, containing both HTML and table of contents.
pub struct MarkdownOutput {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Render markdown to HTML using pulldown-cmark with syntax highlighting and overrides.
pub fn render_markdown(
    markdown: &str,
    highlighter: &SyntaxHighlighter,
    markdown_config: &MarkdownConfig,
    overrides: &Overrides,
) -> Result<MarkdownOutput, MarkdownError> {
    let options = parser_options(markdown_config)?;
    let parser = Parser::new_ext(markdown, options);

    let mut rewriter = Rewriter::new(highlighter, overrides);
    for event in parser {
        rewriter.process(event)?;
    }
    Ok(rewriter.finish())
}

fn parser_options(markdown_config: &MarkdownConfig) -> Result<Options, MarkdownError> {
    let mut options = Options::empty();
    for extension in &markdown_config.extensions {
        match extension.as_str() {
            "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
            "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
            "gfm" => options.insert(Options::ENABLE_GFM),
            "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
            "smart_punctuation" => options.insert(Options::ENABLE_SMART_PUNCTUATION),
            "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
            "tables" => options.insert(Options::ENABLE_TABLES),
            "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
            other => return Err(MarkdownError::InvalidExtension(other.to_string())),
        }
    }
    if markdown_config.math {
        options.insert(Options::ENABLE_MATH);
    }
    Ok(options)
}

/// A node whose rendering is deferred until its end tag.
///
/// Links, images and strong text are only deferred when an override exists,
/// so those variants carry the component that will render them.
enum OpenNode<'a, 'r> {
    Heading {
        level: HeadingLevel,
        id: Option<CowStr<'a>>,
        classes: Vec<CowStr<'a>>,
        attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    },
    Link {
        href: CowStr<'a>,
        title: CowStr<'a>,
        component: &'r dyn LinkComponent,
    },
    Image {
        src: CowStr<'a>,
        title: CowStr<'a>,
        component: &'r dyn ImageComponent,
    },
    CodeBlock {
        lang: String,
    },
    Strong {
        component: &'r dyn StrongComponent,
    },
}

struct Frame<'a, 'r> {
    node: OpenNode<'a, 'r>,
    /// Inner events, rendered to HTML when the frame closes
    events: Vec<Event<'a>>,
    /// Plain text content (heading text, image alt, raw code)
    text: String,
}

struct Rewriter<'a, 'r> {
    highlighter: &'r SyntaxHighlighter,
    overrides: &'r Overrides,
    frames: Vec<Frame<'a, 'r>>,
    output: Vec<Event<'a>>,
    used_heading_ids: HashSet<String>,
    /// Footnote numbers in order of first appearance, shared by all fragments
    footnote_numbers: HashMap<String, usize>,
    toc: Vec<TocEntry>,
}

impl<'a, 'r> Rewriter<'a, 'r> {
    fn new(highlighter: &'r SyntaxHighlighter, overrides: &'r Overrides) -> Self {
        Self {
            highlighter,
            overrides,
            frames: Vec::new(),
            output: Vec::new(),
            used_heading_ids: HashSet::new(),
            footnote_numbers: HashMap::new(),
            toc: Vec::new(),
        }
    }

    fn process(&mut self, event: Event<'a>) -> Result<(), MarkdownError> {
        let overrides = self.overrides;
        match event {
            // Headings are always captured to assign ids and build the TOC
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => self.open(OpenNode::Heading {
                level,
                id,
                classes,
                attrs,
            }),
            Event::End(TagEnd::Heading(_))
                if self.top_is(|n| matches!(n, OpenNode::Heading { .. })) =>
            {
                self.close()?
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => match overrides.link() {
                Some(component) => self.open(OpenNode::Link {
                    href: dest_url,
                    title,
                    component,
                }),
                None => self.emit(Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                })),
            },
            Event::End(TagEnd::Link) if self.top_is(|n| matches!(n, OpenNode::Link { .. })) => {
                self.close()?
            }

            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => match overrides.image() {
                Some(component) => self.open(OpenNode::Image {
                    src: dest_url,
                    title,
                    component,
                }),
                None => self.emit(Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                })),
            },
            Event::End(TagEnd::Image) if self.top_is(|n| matches!(n, OpenNode::Image { .. })) => {
                self.close()?
            }

            Event::Start(Tag::Strong) => match overrides.strong() {
                Some(component) => self.open(OpenNode::Strong { component }),
                None => self.emit(Event::Start(Tag::Strong)),
            },
            Event::End(TagEnd::Strong) if self.top_is(|n| matches!(n, OpenNode::Strong { .. })) => {
                self.close()?
            }

            // Numbered here so captured fragments agree with the main document
            Event::FootnoteReference(name) => {
                let number = self.footnote_number(&name);
                let name = encode_double_quoted_attribute(&name);
                self.emit(Event::InlineHtml(
                    format!(
                        "<sup class=\"footnote-reference\"><a href=\"#{name}\">{number}</a></sup>"
                    )
                    .into(),
                ));
            }
            Event::Start(Tag::FootnoteDefinition(name)) => {
                let number = self.footnote_number(&name);
                let name = encode_double_quoted_attribute(&name);
                self.emit(Event::Html(
                    format!(
                        "<div class=\"footnote-definition\" id=\"{name}\"><sup class=\"footnote-definition-label\">{number}</sup>"
                    )
                    .into(),
                ));
            }
            Event::End(TagEnd::FootnoteDefinition) => self.emit(Event::Html("</div>\n".into())),

            // Code blocks are always captured for syntax highlighting
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info).to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.open(OpenNode::CodeBlock { lang })
            }
            Event::End(TagEnd::CodeBlock)
                if self.top_is(|n| matches!(n, OpenNode::CodeBlock { .. })) =>
            {
                self.close()?
            }
            Event::Text(text) if self.top_is(|n| matches!(n, OpenNode::CodeBlock { .. })) => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.text.push_str(&text);
                }
            }

            Event::Text(text) => {
                self.push_text(&text);
                self.emit(Event::Text(text));
            }
            Event::SoftBreak => {
                self.push_text(" ");
                self.emit(Event::SoftBreak);
            }
            Event::Code(code) => {
                self.push_text(&code);
                match overrides.inline_code() {
                    Some(component) => {
                        let html = component
                            .render(&InlineCodeProps {
                                code: code.to_string(),
                            })
                            .map_err(|source| MarkdownError::Component {
                                kind: NodeKind::InlineCode,
                                source,
                            })?;
                        self.emit(Event::InlineHtml(html.into()));
                    }
                    None => self.emit(Event::Code(code)),
                }
            }
            Event::InlineMath(tex) => {
                self.push_text(&tex);
                self.emit(Event::InlineHtml(math_html(&tex, false).into()));
            }
            Event::DisplayMath(tex) => {
                self.push_text(&tex);
                self.emit(Event::InlineHtml(math_html(&tex, true).into()));
            }

            other => self.emit(other),
        }
        Ok(())
    }

    fn top_is(&self, pred: fn(&OpenNode<'a, 'r>) -> bool) -> bool {
        self.frames.last().is_some_and(|frame| pred(&frame.node))
    }

    fn open(&mut self, node: OpenNode<'a, 'r>) {
        self.frames.push(Frame {
            node,
            events: Vec::new(),
            text: String::new(),
        });
    }

    /// Pop the innermost frame, render it and emit the result to its parent.
    fn close(&mut self) -> Result<(), MarkdownError> {
        if let Some(frame) = self.frames.pop() {
            let event = self.render_frame(frame)?;
            self.emit(event);
        }
        Ok(())
    }

    fn emit(&mut self, event: Event<'a>) {
        match self.frames.last_mut() {
            Some(frame) => frame.events.push(event),
            None => self.output.push(event),
        }
    }

    fn push_text(&mut self, text: &str) {
        for frame in &mut self.frames {
            frame.text.push_str(text);
        }
    }

    fn render_frame(&mut self, frame: Frame<'a, 'r>) -> Result<Event<'a>, MarkdownError> {
        let Frame { node, events, text } = frame;

        let event = match node {
            OpenNode::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                let level = level as u8;
                let id = self.heading_id(id.as_deref(), &text);
                self.toc.push(TocEntry {
                    text: text.clone(),
                    id: id.clone(),
                    level,
                });

                let children = events_to_html(events);
                let html = match self.overrides.heading(level) {
                    Some(component) => component
                        .render(&HeadingProps {
                            level,
                            id,
                            text,
                            children,
                        })
                        .map_err(|source| MarkdownError::Component {
                            kind: NodeKind::Heading(level),
                            source,
                        })?,
                    None => default_heading(level, &id, &classes, &attrs, &children),
                };
                Event::Html(html.into())
            }
            OpenNode::Link {
                href,
                title,
                component,
            } => {
                let html = component
                    .render(&LinkProps {
                        href: href.to_string(),
                        title: title.to_string(),
                        children: events_to_html(events),
                    })
                    .map_err(|source| MarkdownError::Component {
                        kind: NodeKind::Link,
                        source,
                    })?;
                Event::InlineHtml(html.into())
            }
            OpenNode::Image {
                src,
                title,
                component,
            } => {
                let html = component
                    .render(&ImageProps {
                        src: src.to_string(),
                        alt: text,
                        title: title.to_string(),
                    })
                    .map_err(|source| MarkdownError::Component {
                        kind: NodeKind::Image,
                        source,
                    })?;
                Event::InlineHtml(html.into())
            }
            OpenNode::CodeBlock { lang } => {
                let highlighted = self.highlighter.highlight(&text, &lang);
                let html = match self.overrides.code_block() {
                    Some(component) => component
                        .render(&CodeBlockProps {
                            lang,
                            code: text,
                            highlighted,
                        })
                        .map_err(|source| MarkdownError::Component {
                            kind: NodeKind::CodeBlock,
                            source,
                        })?,
                    None => highlighted,
                };
                Event::Html(html.into())
            }
            OpenNode::Strong { component } => {
                let html = component
                    .render(&StrongProps {
                        children: events_to_html(events),
                    })
                    .map_err(|source| MarkdownError::Component {
                        kind: NodeKind::Strong,
                        source,
                    })?;
                Event::InlineHtml(html.into())
            }
        };

        Ok(event)
    }

    /// Pick a unique id for a heading: the explicit `{#id}` if given,
    /// otherwise a slug of its text with a numeric suffix on collision.
    fn heading_id(&mut self, explicit: Option<&str>, text: &str) -> String {
        if let Some(id) = explicit {
            self.used_heading_ids.insert(id.to_string());
            return id.to_string();
        }

        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id = "section".to_string();
        }
        let mut id = base_id.clone();
        let mut suffix = 1;
        while self.used_heading_ids.contains(&id) {
            id = format!("{}-{}", base_id, suffix);
            suffix += 1;
        }
        self.used_heading_ids.insert(id.clone());
        id
    }

    fn footnote_number(&mut self, name: &str) -> usize {
        let next = self.footnote_numbers.len() + 1;
        *self
            .footnote_numbers
            .entry(name.to_string())
            .or_insert(next)
    }

    fn finish(mut self) -> MarkdownOutput {
        // Parser output is balanced; this only matters for truncated input
        for frame in std::mem::take(&mut self.frames) {
            self.output.extend(frame.events);
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, self.output.into_iter());

        MarkdownOutput {
            html: html_output,
            toc: self.toc,
        }
    }
}

fn events_to_html(events: Vec<Event<'_>>) -> String {
    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

/// Language token of a fence info string: "rust,ignore title=x" -> "rust".
fn fence_language(info: &str) -> &str {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or("")
}

fn default_heading(
    level: u8,
    id: &str,
    classes: &[CowStr<'_>],
    attrs: &[(CowStr<'_>, Option<CowStr<'_>>)],
    children: &str,
) -> String {
    let id = encode_double_quoted_attribute(id);

    // Build class attribute if there are classes
    let class_attr = if classes.is_empty() {
        String::new()
    } else {
        let classes: Vec<&str> = classes.iter().map(|c| c.as_ref()).collect();
        format!(
            " class=\"{}\"",
            encode_double_quoted_attribute(&classes.join(" "))
        )
    };

    let extra_attrs = attrs
        .iter()
        .map(|(k, v)| match v {
            Some(val) => format!(" {}=\"{}\"", k, encode_double_quoted_attribute(val)),
            None => format!(" {}", k),
        })
        .collect::<String>();

    let permalink = format!(
        "<a class=\"header-anchor\" href=\"#{}\" aria-label=\"Link to this heading\">#</a>",
        id
    );
    format!(
        "<h{level} id=\"{id}\"{class_attr}{extra_attrs}>{children} {permalink}</h{level}>\n"
    )
}

/// Markup picked up by the KaTeX bootstrap script of the page layout.
fn math_html(tex: &str, display: bool) -> String {
    let mode = if display { "math-display" } else { "math-inline" };
    format!("<span class=\"math {}\">{}</span>", mode, encode_text(tex))
}

/// Convert a string to a slug suitable for use as an HTML id.
pub fn slugify(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(' ', "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "")
}
