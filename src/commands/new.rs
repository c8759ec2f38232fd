//! Create a new content file

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::ContentType;
use crate::Site;

/// Create a content file with a front-matter scaffold.
///
/// The file name is the slugified title unless `slug` is given.
pub fn create_post(
    site: &Site,
    title: &str,
    content_type: ContentType,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let now = chrono::Utc::now();

    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from {:?}", title);
    }

    let target_dir = site.content_dir.join(content_type.directory());
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        r#"---
title: "{title}"
description: ""
date: {date}
type: {content_type}
targetKeywords: []
status: draft
---
"#,
        title = title.replace('"', "\\\""),
        date = now.format("%Y-%m-%d"),
        content_type = content_type,
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(
    site: &Site,
    title: &str,
    content_type: ContentType,
    slug: Option<&str>,
) -> Result<PathBuf> {
    tracing::info!("Creating new {} with title: {}", content_type, title);
    create_post(site, title, content_type, slug)
}
