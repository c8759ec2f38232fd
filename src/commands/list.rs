//! List site content

use anyhow::Result;

use crate::content::ContentType;
use crate::Site;

/// List content of one type, or of every type with `all`
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let types: Vec<ContentType> = match content_type {
        "all" => ContentType::ALL.to_vec(),
        "blog" | "posts" => vec![ContentType::BlogPost],
        other => match other.parse::<ContentType>() {
            Ok(t) => vec![t],
            Err(_) => anyhow::bail!(
                "Unknown type: {}. Available: all, blog-post, comparison, faq",
                other
            ),
        },
    };

    let loader = site.content_loader();

    for content_type in types {
        let items = loader.list_posts(content_type);
        println!("{} ({}):", content_type, items.len());
        for item in items {
            println!(
                "  {} - {} [{}]",
                item.date.format("%Y-%m-%d"),
                item.title,
                item.path()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_types() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();

        assert!(run(&site, "all").is_ok());
        assert!(run(&site, "faq").is_ok());
        assert!(run(&site, "blog").is_ok());
        assert!(run(&site, "tags").is_err());
    }
}
