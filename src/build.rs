mod builder;
mod document;
pub mod format;
mod highlight;
mod markdown;
mod page;
mod paths;

pub use builder::{BuildError, BuildResult, Builder};
pub use highlight::SyntaxHighlighter;
pub use markdown::{MarkdownError, MarkdownOutput, render_markdown, slugify};
pub use page::{DEFAULT_LAYOUT, PageError, TocEntry};
