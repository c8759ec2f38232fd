//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded in the binary. The same renderer serves
//! pages from the HTTP server and writes them during static export.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{ContentItem, ContentType};
use crate::helpers::{display_date, iso_timestamp, parse_date_string};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping would also escape `/` in paths; content-derived text
        // is escaped explicitly in the templates instead
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("listing.html", include_str!("site/listing.html")),
            ("article.html", include_str!("site/article.html")),
            ("not_found.html", include_str!("site/not_found.html")),
        ])?;

        tera.register_filter("display_date", display_date_filter);

        Ok(Self {
            tera,
            site: SiteData::from(config),
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Landing page with the waitlist form
    pub fn render_home(&self) -> Result<String> {
        let mut context = self.base_context(&self.site.tagline, &self.site.description);
        context.insert("is_home", &true);
        self.render("home.html", &context)
    }

    /// Index page of one content type
    pub fn render_listing(&self, content_type: ContentType, items: &[ContentItem]) -> Result<String> {
        let section = SectionData::from(content_type);
        let items: Vec<ItemData> = items.iter().map(ItemData::from).collect();

        let mut context = self.base_context(&section.heading, &self.site.description);
        context.insert("section", &section);
        context.insert("items", &items);
        self.render("listing.html", &context)
    }

    /// A single blog post, comparison or FAQ
    pub fn render_article(&self, item: &ContentItem) -> Result<String> {
        let back = match item.content_type {
            ContentType::BlogPost => BackLink {
                path: ContentType::BlogPost.route().to_string(),
                label: "Back to Blog".to_string(),
            },
            _ => BackLink {
                path: "/".to_string(),
                label: "Back to Home".to_string(),
            },
        };

        let mut context = self.base_context(&item.title, &item.description);
        context.insert("item", &ItemData::from(item));
        context.insert("back", &back);
        self.render("article.html", &context)
    }

    /// Page shown for unknown routes and missing items
    pub fn render_not_found(&self) -> Result<String> {
        let context = self.base_context("Page Not Found", &self.site.description);
        self.render("not_found.html", &context)
    }

    /// Create a base context with common variables
    fn base_context(&self, page_title: &str, page_description: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("page_title", page_title);
        context.insert("page_description", page_description);
        context.insert("current_year", &chrono::Utc::now().format("%Y").to_string());
        context
    }
}

/// Tera filter: format an ISO-8601 timestamp like "January 5, 2024"
fn display_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("display_date", "value", String, value);
    match parse_date_string(&s) {
        Some(date) => Ok(tera::Value::String(display_date(&date))),
        None => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub keywords: String,
    pub publisher: String,
    pub url: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            tagline: config.tagline.clone(),
            description: config.description.clone(),
            keywords: config.keywords.join(", "),
            publisher: config.publisher.clone(),
            url: config.url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemData {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub path: String,
    pub content: String,
    pub keywords: String,
}

impl From<&ContentItem> for ItemData {
    fn from(item: &ContentItem) -> Self {
        Self {
            slug: item.slug.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            date: iso_timestamp(&item.date),
            path: item.path(),
            content: item.content.clone(),
            keywords: item.target_keywords.join(", "),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    pub intro: String,
    pub empty_heading: String,
    pub empty_text: String,
    pub link_label: String,
}

impl From<ContentType> for SectionData {
    fn from(content_type: ContentType) -> Self {
        let (heading, intro, link_label) = match content_type {
            ContentType::BlogPost => (
                "Cardiovascular Health Blog",
                "Expert insights on the cardiovascular biomarkers that matter most, and the advanced testing strategies that help prevent heart disease.",
                "Read article",
            ),
            ContentType::Comparison => (
                "Comparisons",
                "Side-by-side looks at cardiac tests, panels and providers.",
                "Read comparison",
            ),
            ContentType::Faq => (
                "Frequently Asked Questions",
                "Straight answers about biomarkers, testing and results.",
                "Read answer",
            ),
        };

        Self {
            heading: heading.to_string(),
            intro: intro.to_string(),
            empty_heading: "Coming Soon".to_string(),
            empty_text: "We're preparing comprehensive guides. Check back soon.".to_string(),
            link_label: link_label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BackLink {
    pub path: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(content_type: ContentType) -> ContentItem {
        ContentItem {
            slug: "apob-basics".to_string(),
            title: "ApoB <Basics>".to_string(),
            description: "What ApoB measures".to_string(),
            content_type,
            date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            content: "<p>Body <strong>text</strong></p>\n".to_string(),
            target_keywords: vec!["apob".to_string()],
            idea_name: None,
            status: None,
        }
    }

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(&SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_render_home() {
        let html = renderer().render_home().unwrap();
        assert!(html.contains("CardioGuard"));
        assert!(html.contains("/api/signup"));
        assert!(html.contains(r#"type="email""#));
    }

    #[test]
    fn test_render_article() {
        let html = renderer().render_article(&item(ContentType::BlogPost)).unwrap();
        assert!(html.contains("March 1, 2024"));
        // Titles are escaped, rendered markdown is not
        assert!(html.contains("ApoB &lt;Basics&gt;"));
        assert!(html.contains("<p>Body <strong>text</strong></p>"));
        assert!(html.contains(r#"href="/blog""#));
    }

    #[test]
    fn test_article_back_link_for_other_types() {
        let html = renderer().render_article(&item(ContentType::Faq)).unwrap();
        assert!(html.contains("Back to Home"));
    }

    #[test]
    fn test_render_listing() {
        let html = renderer()
            .render_listing(ContentType::BlogPost, &[item(ContentType::BlogPost)])
            .unwrap();
        assert!(html.contains("Cardiovascular Health Blog"));
        assert!(html.contains(r#"href="/blog/apob-basics""#));
        assert!(!html.contains("Coming Soon"));
    }

    #[test]
    fn test_render_empty_listing() {
        let html = renderer().render_listing(ContentType::BlogPost, &[]).unwrap();
        assert!(html.contains("Coming Soon"));
    }

    #[test]
    fn test_render_not_found() {
        let html = renderer().render_not_found().unwrap();
        assert!(html.contains("Page Not Found"));
    }
}
