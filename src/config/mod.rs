//! Configuration module

mod site;

pub use site::MarkdownConfig;
pub use site::SiteConfig;
pub use site::StoreConfig;
pub use site::{ENV_SITE_ID, ENV_STORE_TOKEN, ENV_STORE_URL};
