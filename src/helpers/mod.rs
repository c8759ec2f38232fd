//! Helper functions shared by content, signups and templates

mod date;

pub use date::*;
