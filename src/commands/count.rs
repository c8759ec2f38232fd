//! Print the waitlist signup count

use anyhow::Result;

use crate::Site;

/// Read the signup counter for the configured site
pub async fn run(site: &Site) -> Result<i64> {
    let service = site.signup_service()?;
    let count = service.count().await;
    println!("Signups for {}: {}", service.site_id(), count);
    Ok(count)
}
