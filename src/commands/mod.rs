//! CLI commands

pub mod clean;
pub mod count;
pub mod generate;
pub mod list;
pub mod new;
