//! Generate static files

use anyhow::Result;

use crate::generator::{GenerateStats, Generator};
use crate::Site;

/// Export the whole site into the public directory
pub fn run(site: &Site) -> Result<GenerateStats> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let stats = generator.generate()?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages and copied {} assets in {:.2}s",
        stats.pages,
        stats.assets,
        duration.as_secs_f64()
    );

    Ok(stats)
}
