//! Waitlist signup flow

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

use super::{is_valid_email, RequestMeta, SignupRecord};
use crate::store::{SignupStore, StoreError};

/// Message shown to callers when the store fails
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Please try again.";

/// Why a signup was refused
#[derive(Error, Debug)]
pub enum SignupError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("This email is already registered")]
    AlreadyRegistered,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to encode signup record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SignupError {
    /// The caller can fix this by changing the input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SignupError::EmailRequired | SignupError::InvalidEmail | SignupError::AlreadyRegistered
        )
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            SignupError::Store(_) | SignupError::Encode(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Validates emails and records them in the store, namespaced by site id.
///
/// The duplicate check scans the list and then appends without holding any
/// lock, so two concurrent signups for the same address can both succeed.
#[derive(Clone)]
pub struct SignupService {
    store: Arc<dyn SignupStore>,
    site_id: String,
}

impl SignupService {
    pub fn new(store: Arc<dyn SignupStore>, site_id: impl Into<String>) -> Self {
        Self {
            store,
            site_id: site_id.into(),
        }
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Key of the list holding JSON-encoded signup records
    pub fn list_key(&self) -> String {
        format!("email_signups:{}", self.site_id)
    }

    /// Key of the signup counter
    pub fn count_key(&self) -> String {
        format!("email_signups_count:{}", self.site_id)
    }

    /// Register an email on the waitlist
    pub async fn signup(
        &self,
        email: Option<&str>,
        meta: &RequestMeta,
    ) -> Result<SignupRecord, SignupError> {
        let email = match email {
            Some(email) if !email.is_empty() => email,
            _ => return Err(SignupError::EmailRequired),
        };

        if !is_valid_email(email) {
            return Err(SignupError::InvalidEmail);
        }

        let result = self.record(email, meta).await;
        if let Err(e) = &result {
            if !e.is_validation() {
                tracing::error!("Signup error for site {}: {}", self.site_id, e);
            }
        }
        result
    }

    /// Duplicate check, append, increment. No rollback if a later step fails.
    async fn record(&self, email: &str, meta: &RequestMeta) -> Result<SignupRecord, SignupError> {
        let list_key = self.list_key();

        let existing = self.store.list_all(&list_key).await?;
        if existing.iter().any(|entry| entry_matches(entry, email)) {
            return Err(SignupError::AlreadyRegistered);
        }

        let record = SignupRecord {
            email: email.to_string(),
            timestamp: Utc::now(),
            ip: meta.client_ip(),
            user_agent: meta.user_agent(),
        };
        let encoded = serde_json::to_string(&record)?;

        let length = self.store.append(&list_key, &encoded).await?;
        let count = self.store.increment(&self.count_key()).await?;
        tracing::debug!(
            "Recorded signup for site {} (list {}, counter {})",
            self.site_id,
            length,
            count
        );

        Ok(record)
    }

    /// Number of signups so far. Store failures read as 0.
    pub async fn count(&self) -> i64 {
        match self.store.counter(&self.count_key()).await {
            Ok(count) => count.unwrap_or(0),
            Err(e) => {
                tracing::error!("Get count error for site {}: {}", self.site_id, e);
                0
            }
        }
    }
}

/// A stored entry belongs to `email`: either a record whose email matches
/// exactly, or (for entries that are not records) the bare string itself
fn entry_matches(entry: &str, email: &str) -> bool {
    match serde_json::from_str::<SignupRecord>(entry) {
        Ok(record) => record.email == email,
        Err(_) => entry == email,
    }
}
