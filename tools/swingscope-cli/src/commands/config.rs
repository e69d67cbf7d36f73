//! Show or persist the effective configuration.

use std::path::PathBuf;

use swingscope_analysis_engine::Settings;
use swingscope_common::config_file_path;

pub fn run(settings: Settings, path: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&settings)?);

    if write {
        let path = path.unwrap_or_else(config_file_path);
        settings
            .save_to(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;
        println!("\nConfiguration saved to: {}", path.display());
    }

    Ok(())
}
