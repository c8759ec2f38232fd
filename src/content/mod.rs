//! Content module - blog posts, comparisons and FAQs loaded from markdown

mod error;
mod frontmatter;
mod item;
pub mod loader;
mod markdown;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use item::{ContentItem, ContentType};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
