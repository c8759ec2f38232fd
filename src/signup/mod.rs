//! Signup module - email waitlist backed by the key-value store

mod record;
mod service;
mod validate;

pub use record::{RequestMeta, SignupRecord, UNKNOWN};
pub use service::{SignupError, SignupService, INTERNAL_ERROR_MESSAGE};
pub use validate::is_valid_email;
