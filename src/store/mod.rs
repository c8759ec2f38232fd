//! Key-value store holding the signup list and counter
//!
//! The hosted store is only used through four list/counter commands, so the
//! rest of the crate talks to a [`SignupStore`] and never to a client type.

mod memory;
mod upstash;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use memory::MemoryStore;
pub use upstash::UpstashStore;

use crate::config::StoreConfig;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors talking to the store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport failure or undecodable response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The store rejected the command
    #[error("store command failed: {0}")]
    Command(String),

    /// The reply did not have the shape the command implies
    #[error("unexpected store reply: {0}")]
    UnexpectedReply(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The list and counter operations the signup flow needs
#[async_trait]
pub trait SignupStore: Send + Sync {
    /// Every element of the list under `key`, in order (`LRANGE key 0 -1`)
    async fn list_all(&self, key: &str) -> Result<Vec<String>>;

    /// Append to the list under `key`, returning its new length (`RPUSH`)
    async fn append(&self, key: &str, value: &str) -> Result<u64>;

    /// Increment the counter under `key`, returning the new value (`INCR`)
    async fn increment(&self, key: &str) -> Result<i64>;

    /// Current counter value, `None` when unset (`GET`)
    async fn counter(&self, key: &str) -> Result<Option<i64>>;
}

/// Build the store described by the config.
///
/// Without both an endpoint and a token, signups are kept in process
/// memory and lost on restart.
pub fn connect(config: &StoreConfig) -> anyhow::Result<Arc<dyn SignupStore>> {
    match config.credentials() {
        Some((url, token)) => {
            tracing::info!("Using Upstash store at {}", url);
            Ok(Arc::new(UpstashStore::new(url, token)?))
        }
        None => {
            tracing::warn!(
                "No store configured ({} / {} unset), keeping signups in memory",
                crate::config::ENV_STORE_URL,
                crate::config::ENV_STORE_TOKEN
            );
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
