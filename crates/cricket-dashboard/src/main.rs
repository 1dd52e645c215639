mod bootstrap;
mod render;

use std::io::Write;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::reader::Dataset;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Cricket dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {:?}, format: {:?}, top-n: {}",
        settings.view,
        settings.format,
        settings.top_n
    );

    // Loaded once; every view below reads this same immutable dataset.
    let sources = settings.sources();
    let dataset = Dataset::load(&sources).with_context(|| {
        format!(
            "could not load dashboard tables (matches: {})",
            sources.matches.display()
        )
    })?;

    let output = render::render(&settings, &dataset)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
