//! Generator module - exports every page as static HTML using the built-in templates

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{ContentLoader, ContentType};
use crate::templates::TemplateRenderer;
use crate::Site;

/// Summary of one export run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateStats {
    pub pages: usize,
    pub assets: usize,
}

/// Static site exporter
pub struct Generator {
    site: Site,
    loader: ContentLoader,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            loader: site.content_loader(),
            renderer: TemplateRenderer::new(&site.config)?,
        })
    }

    /// Generate the entire site into the public directory
    pub fn generate(&self) -> Result<GenerateStats> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)?;

        let mut stats = GenerateStats::default();

        write_page(&public_dir.join("index.html"), &self.renderer.render_home()?)?;
        write_page(&public_dir.join("404.html"), &self.renderer.render_not_found()?)?;
        stats.pages += 2;

        for content_type in ContentType::ALL {
            let items = self.loader.list_posts(content_type);
            tracing::info!("Loaded {} {} item(s)", items.len(), content_type);

            let section_dir = public_dir.join(content_type.route().trim_start_matches('/'));

            // Only the blog has an index page
            if content_type == ContentType::BlogPost {
                let html = self.renderer.render_listing(content_type, &items)?;
                write_page(&section_dir.join("index.html"), &html)?;
                stats.pages += 1;
            }

            for item in &items {
                let html = self.renderer.render_article(item)?;
                write_page(&section_dir.join(&item.slug).join("index.html"), &html)?;
                stats.pages += 1;
            }
        }

        stats.assets = self.copy_static_assets()?;

        Ok(stats)
    }

    /// Copy the static directory verbatim into the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.site.static_dir;
        if !static_dir.is_dir() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest)?;
            copied += 1;
        }

        Ok(copied)
    }
}

/// Write one rendered page, creating parent directories
fn write_page(output_path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(output_path, html)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
    tracing::debug!("Generated: {:?}", output_path);
    Ok(())
}
