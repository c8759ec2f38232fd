//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

/// Why a content item could not be produced.
///
/// Listings and `get_post` collapse all of these into "absent"; `load_post`
/// hands them to callers that need to tell a missing file from a broken one.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("unknown content type: {0}")]
    UnknownType(String),

    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("content file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front-matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}

impl ContentError {
    /// The item simply does not exist (as opposed to being malformed)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::UnknownType(_) | ContentError::InvalidSlug(_) | ContentError::NotFound(_)
        )
    }
}
