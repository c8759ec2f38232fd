//! Content loader - reads markdown files from the per-type content directories

use chrono::Utc;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::frontmatter::non_empty;
use super::{ContentError, ContentItem, ContentType, FrontMatter, MarkdownRenderer};
use crate::helpers::parse_date_string;

/// Extension content files must carry
const CONTENT_EXTENSION: &str = "md";

/// Loads content items from `<root>/<type directory>/<slug>.md`
#[derive(Clone)]
pub struct ContentLoader {
    root: PathBuf,
    renderer: Arc<MarkdownRenderer>,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new<P: Into<PathBuf>>(root: P, renderer: MarkdownRenderer) -> Self {
        Self {
            root: root.into(),
            renderer: Arc::new(renderer),
        }
    }

    /// Content root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the files of one content type
    pub fn directory(&self, content_type: ContentType) -> PathBuf {
        self.root.join(content_type.directory())
    }

    /// Load every item of a type, newest first.
    ///
    /// A missing directory gives an empty list. Files that cannot be read or
    /// parsed are logged and left out.
    pub fn list_posts(&self, content_type: ContentType) -> Vec<ContentItem> {
        let dir = self.directory(content_type);
        if !dir.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", dir);
            return Vec::new();
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_content_file(path) {
                continue;
            }

            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!("Skipping content file with non UTF-8 name {:?}", path);
                continue;
            };

            match self.load_file(content_type, slug, path) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Failed to load {} {:?}: {}", content_type, path, e);
                }
            }
        }

        // Sort by date descending (newest first); sort_by is stable
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        posts
    }

    /// Same as [`list_posts`](Self::list_posts) for a textual type tag.
    /// Unknown tags give an empty list.
    pub fn list_posts_by_tag(&self, tag: &str) -> Vec<ContentItem> {
        match tag.parse::<ContentType>() {
            Ok(content_type) => self.list_posts(content_type),
            Err(e) => {
                tracing::debug!("{}", e);
                Vec::new()
            }
        }
    }

    /// Look up a single item. Missing and malformed files are both `None`.
    pub fn get_post(&self, content_type: ContentType, slug: &str) -> Option<ContentItem> {
        match self.load_post(content_type, slug) {
            Ok(post) => Some(post),
            Err(e) if e.is_not_found() => {
                tracing::debug!("{}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to load {} {:?}: {}", content_type, slug, e);
                None
            }
        }
    }

    /// Same as [`get_post`](Self::get_post) for a textual type tag
    pub fn get_post_by_tag(&self, tag: &str, slug: &str) -> Option<ContentItem> {
        let content_type = tag.parse::<ContentType>().ok()?;
        self.get_post(content_type, slug)
    }

    /// Look up a single item, reporting why it could not be produced
    pub fn load_post(
        &self,
        content_type: ContentType,
        slug: &str,
    ) -> Result<ContentItem, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::InvalidSlug(slug.to_string()));
        }

        let path = self
            .directory(content_type)
            .join(format!("{}.{}", slug, CONTENT_EXTENSION));
        if !path.is_file() {
            return Err(ContentError::NotFound(path));
        }

        self.load_file(content_type, slug, &path)
    }

    /// Read, split and render one file
    fn load_file(
        &self,
        content_type: ContentType,
        slug: &str,
        path: &Path,
    ) -> Result<ContentItem, ContentError> {
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&raw)?;

        let date = match non_empty(fm.date) {
            Some(date) => parse_date_string(&date).unwrap_or_else(|| {
                tracing::warn!("{:?} has unreadable date {:?}, using now", path, date);
                Utc::now()
            }),
            None => Utc::now(),
        };

        let declared_type = match non_empty(fm.content_type) {
            Some(tag) => match tag.parse::<ContentType>() {
                Ok(t) => t,
                Err(_) => {
                    tracing::warn!(
                        "{:?} declares unknown type {:?}, using {}",
                        path,
                        tag,
                        content_type
                    );
                    content_type
                }
            },
            None => content_type,
        };

        Ok(ContentItem {
            slug: slug.to_string(),
            title: non_empty(fm.title).unwrap_or_else(|| "Untitled".to_string()),
            description: non_empty(fm.description).unwrap_or_default(),
            content_type: declared_type,
            date,
            content: self.renderer.render(body),
            target_keywords: fm.target_keywords,
            idea_name: fm.idea_name,
            status: fm.status,
        })
    }
}

/// Check if a file is a content (markdown) file
fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == CONTENT_EXTENSION)
        .unwrap_or(false)
}

/// A slug must name a file directly inside the type directory
fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(slug).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn write(root: &Path, dir: &str, name: &str, content: &str) {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n\nBody of {}.\n", title, date, title)
    }

    fn loader(root: &TempDir) -> ContentLoader {
        ContentLoader::new(root.path(), MarkdownRenderer::new())
    }

    #[test]
    fn test_list_sorted_by_date_descending() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog", "january.md", &post("January", "2024-01-01"));
        write(tmp.path(), "blog", "march.md", &post("March", "2024-03-01"));
        write(tmp.path(), "blog", "february.md", &post("February", "2024-02-01"));

        let posts = loader(&tmp).list_posts(ContentType::BlogPost);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["march", "february", "january"]);
        assert_eq!(
            posts[0].date,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(loader(&tmp).list_posts(ContentType::Faq).is_empty());
    }

    #[test]
    fn test_list_empty_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("comparison")).unwrap();
        assert!(loader(&tmp).list_posts(ContentType::Comparison).is_empty());
    }

    #[test]
    fn test_list_unknown_tag_is_empty() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog", "a.md", &post("A", "2024-01-01"));
        let loader = loader(&tmp);
        assert!(loader.list_posts_by_tag("recipe").is_empty());
        assert_eq!(loader.list_posts_by_tag("blog-post").len(), 1);
    }

    #[test]
    fn test_list_skips_non_markdown_and_malformed() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog", "good.md", &post("Good", "2024-01-01"));
        write(tmp.path(), "blog", "notes.txt", "not content");
        write(tmp.path(), "blog", "broken.md", "---\ntitle: [oops\n---\nBody");

        let posts = loader(&tmp).list_posts(ContentType::BlogPost);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
    }

    #[test]
    fn test_dates_with_offsets_are_kept() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog", "spaced.md", &post("Spaced", "2024-01-15 10:30:00 +0000"));
        write(tmp.path(), "blog", "compact.md", &post("Compact", "2024-01-15T10:30:00+0000"));

        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let posts = loader(&tmp).list_posts(ContentType::BlogPost);
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.date == expected));
    }

    #[test]
    fn test_unreadable_date_falls_back_to_now() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog", "old.md", &post("Old", "2020-01-01"));
        write(tmp.path(), "blog", "someday.md", &post("Someday", "someday"));

        let before = Utc::now();
        let loader = loader(&tmp);
        let item = loader.get_post(ContentType::BlogPost, "someday").unwrap();
        assert_eq!(item.title, "Someday");
        assert!(item.date >= before);

        let posts = loader.list_posts(ContentType::BlogPost);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "someday");
    }

    #[test]
    fn test_get_post() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "comparison",
            "apob-vs-ldl.md",
            "---\ntitle: ApoB vs LDL\ndescription: Which matters\ndate: 2024-05-01\ntargetKeywords: apob\nideaName: cardioguard\nstatus: live\n---\n\n## Verdict\n\nApoB **wins**.\n",
        );

        let item = loader(&tmp)
            .get_post(ContentType::Comparison, "apob-vs-ldl")
            .unwrap();
        assert_eq!(item.slug, "apob-vs-ldl");
        assert_eq!(item.title, "ApoB vs LDL");
        assert_eq!(item.description, "Which matters");
        assert_eq!(item.content_type, ContentType::Comparison);
        assert_eq!(item.target_keywords, vec!["apob"]);
        assert_eq!(item.idea_name.as_deref(), Some("cardioguard"));
        assert_eq!(item.status.as_deref(), Some("live"));
        assert!(item.content.contains("<h2>Verdict</h2>"));
        assert!(item.content.contains("<strong>wins</strong>"));
    }

    #[test]
    fn test_defaults_without_frontmatter() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "faq", "plain.md", "Just an answer.\n");

        let before = Utc::now();
        let item = loader(&tmp).get_post(ContentType::Faq, "plain").unwrap();
        assert_eq!(item.title, "Untitled");
        assert_eq!(item.description, "");
        assert_eq!(item.content_type, ContentType::Faq);
        assert!(item.target_keywords.is_empty());
        assert!(item.date >= before);
        assert_eq!(item.content, "<p>Just an answer.</p>\n");
    }

    #[test]
    fn test_declared_type_wins_unknown_falls_back() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog", "moved.md", "---\ntype: faq\n---\nx");
        write(tmp.path(), "blog", "odd.md", "---\ntype: recipe\n---\nx");

        let loader = loader(&tmp);
        let moved = loader.get_post(ContentType::BlogPost, "moved").unwrap();
        assert_eq!(moved.content_type, ContentType::Faq);
        let odd = loader.get_post(ContentType::BlogPost, "odd").unwrap();
        assert_eq!(odd.content_type, ContentType::BlogPost);
    }

    #[test]
    fn test_missing_and_malformed_are_both_absent() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog", "broken.md", "---\ntitle: [oops\n---\nBody");

        let loader = loader(&tmp);
        assert!(loader.get_post(ContentType::BlogPost, "missing").is_none());
        assert!(loader.get_post(ContentType::BlogPost, "broken").is_none());
        assert!(loader.get_post_by_tag("recipe", "broken").is_none());

        let missing = loader.load_post(ContentType::BlogPost, "missing").unwrap_err();
        assert!(matches!(missing, ContentError::NotFound(_)));
        assert!(missing.is_not_found());

        let broken = loader.load_post(ContentType::BlogPost, "broken").unwrap_err();
        assert!(matches!(broken, ContentError::FrontMatter(_)));
        assert!(!broken.is_not_found());
    }

    #[test]
    fn test_slug_cannot_escape_directory() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog", "inside.md", &post("Inside", "2024-01-01"));
        write(tmp.path(), "faq", "secret.md", &post("Secret", "2024-01-01"));

        let loader = loader(&tmp);
        assert!(loader.get_post(ContentType::BlogPost, "inside").is_some());
        for slug in ["../faq/secret", "..", ".", "", "a/b", "a\\b", "/etc/passwd"] {
            assert!(
                matches!(
                    loader.load_post(ContentType::BlogPost, slug),
                    Err(ContentError::InvalidSlug(_))
                ),
                "slug {:?} should be rejected",
                slug
            );
        }
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("apob-vs-ldl"));
        assert!(is_valid_slug("v1.2"));
        assert!(!is_valid_slug("../x"));
    }
}
