//! Site configuration (_config.yml + environment)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the Upstash REST endpoint
pub const ENV_STORE_URL: &str = "UPSTASH_REDIS_REST_URL";
/// Environment variable holding the Upstash REST token
pub const ENV_STORE_TOKEN: &str = "UPSTASH_REDIS_REST_TOKEN";
/// Environment variable holding the site identifier
pub const ENV_SITE_ID: &str = "SITE_ID";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub publisher: String,
    pub url: String,

    // Signups are namespaced by this identifier in the store
    pub site_id: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    #[serde(default)]
    pub markdown: MarkdownConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "CardioGuard".to_string(),
            tagline: "Best Cardiovascular Biomarkers for Entrepreneurs".to_string(),
            description: "Skip insurance hassles - get ApoB, Lp(a), and advanced cardiac tests directly."
                .to_string(),
            keywords: Vec::new(),
            publisher: "CardioGuard".to_string(),
            url: "http://localhost:3000".to_string(),

            site_id: "cardioguard".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            markdown: MarkdownConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Override store and site settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override store and site settings from an arbitrary variable lookup.
    /// Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_STORE_URL) {
            self.store.url = Some(url);
        }
        if let Some(token) = lookup(ENV_STORE_TOKEN) {
            self.store.token = Some(token);
        }
        if let Some(site_id) = lookup(ENV_SITE_ID) {
            self.site_id = site_id;
        }
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Highlight fenced code blocks with syntect
    pub highlight: bool,
    pub theme: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Hosted key-value store connection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

impl StoreConfig {
    /// Endpoint and token, when both are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.url.as_deref()?, self.token.as_deref()?))
    }
}
