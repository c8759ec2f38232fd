//! Content item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ContentError;

/// The kinds of content the site publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    BlogPost,
    Comparison,
    Faq,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [
        ContentType::BlogPost,
        ContentType::Comparison,
        ContentType::Faq,
    ];

    /// Textual tag, as used in front-matter
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "blog-post",
            ContentType::Comparison => "comparison",
            ContentType::Faq => "faq",
        }
    }

    /// Directory (below the content root) holding this type's files
    pub fn directory(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "blog",
            ContentType::Comparison => "comparison",
            ContentType::Faq => "faq",
        }
    }

    /// URL prefix the site serves this type under
    pub fn route(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "/blog",
            ContentType::Comparison => "/compare",
            ContentType::Faq => "/faq",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ContentError::UnknownType(s.to_string()))
    }
}

/// A blog post, comparison or FAQ entry, rendered from one markdown file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// File name without the `.md` extension
    pub slug: String,

    pub title: String,

    pub description: String,

    #[serde(rename = "type")]
    pub content_type: ContentType,

    #[serde(with = "crate::helpers::iso8601")]
    pub date: DateTime<Utc>,

    /// Rendered HTML body
    pub content: String,

    pub target_keywords: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idea_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ContentItem {
    /// Site-relative URL of this item
    pub fn path(&self) -> String {
        format!("{}/{}", self.content_type.route(), self.slug)
    }
}
