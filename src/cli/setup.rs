use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example configuration to the default config location.
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path)
}

/// Writes the example configuration to `path` and prints what to fill in next.
/// An existing file is never overwritten.
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    let example: AppConfig =
        serde_yaml::from_str(EXAMPLE_CONFIG).context("Bundled example config is invalid")?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    }
    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write example config to {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote example configuration");
    println!("{}", next_steps(path, &example));
    Ok(())
}

fn next_steps(path: &Path, example: &AppConfig) -> String {
    format!(
        "Configuration written to {}\n\
         Edit sheet.sheet_id and sheet.range, then place the sheet credentials at {}.\n\
         Run `ordersync sync --dry-run` to preview the first pass.",
        path.display(),
        example.sheet.credentials_file
    )
}
