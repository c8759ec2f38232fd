//! Signup record and the request details captured with it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value stored when a field could not be determined
pub const UNKNOWN: &str = "unknown";

/// One waitlist entry, stored JSON-encoded in the signup list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRecord {
    pub email: String,
    #[serde(with = "crate::helpers::iso8601")]
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub user_agent: String,
}

/// Request headers the signup flow records
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    /// Raw `x-forwarded-for` header
    pub forwarded_for: Option<String>,
    /// Raw `user-agent` header
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Client address: first `x-forwarded-for` hop, or "unknown"
    pub fn client_ip(&self) -> String {
        self.forwarded_for
            .as_deref()
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    /// User agent, or "unknown"
    pub fn user_agent(&self) -> String {
        self.user_agent
            .as_deref()
            .filter(|ua| !ua.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    }
}
