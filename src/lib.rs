//! landing-rs: landing page server with an email waitlist
//!
//! This crate serves a marketing landing page, records waitlist signups in
//! a hosted key-value store, and renders a markdown-driven content section
//! (blog posts, comparisons, FAQs) with embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod signup;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// The landing site rooted at one directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content root (holds blog/, comparison/, faq/)
    pub content_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets directory
    pub static_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new Site from a directory.
    ///
    /// Reads `_config.yml` when present, then applies environment overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Site from an already assembled configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            static_dir,
        }
    }

    /// Loader for this site's content directory
    pub fn content_loader(&self) -> content::ContentLoader {
        let renderer = content::MarkdownRenderer::from_config(&self.config.markdown);
        content::ContentLoader::new(self.content_dir.clone(), renderer)
    }

    /// Signup service over the configured store
    pub fn signup_service(&self) -> Result<signup::SignupService> {
        let store = store::connect(&self.config.store)?;
        Ok(self.signup_service_with(store))
    }

    /// Signup service over an explicit store
    pub fn signup_service_with(&self, store: Arc<dyn store::SignupStore>) -> signup::SignupService {
        signup::SignupService::new(store, self.config.site_id.clone())
    }

    /// Export the static site
    pub fn generate(&self) -> Result<generator::GenerateStats> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new content file
    pub fn new_post(
        &self,
        title: &str,
        content_type: content::ContentType,
        slug: Option<&str>,
    ) -> Result<std::path::PathBuf> {
        commands::new::run(self, title, content_type, slug)
    }
}
