//! Check a file against the configured input limits.

use std::path::PathBuf;

use swingscope_analysis_engine::{validate_video_file, AnalysisService, ReplayBackend, Settings};

pub fn run(path: PathBuf, settings: Settings) -> anyhow::Result<()> {
    println!("Validating input at: {}", path.display());

    let service = AnalysisService::new(settings, ReplayBackend)
        .map_err(|e| anyhow::anyhow!("Invalid settings: {e}"))?;
    let video = &service.settings().video;

    let input = service
        .validate_input(&path)
        .map_err(|e| anyhow::anyhow!("Input rejected: {e}"))?;

    println!("  Format: {}", input.extension);
    println!(
        "  Size: {:.2} MB (limit {} MB)",
        input.size_bytes as f64 / (1024.0 * 1024.0),
        video.max_file_size_mb
    );

    if validate_video_file(&path, video).is_ok() {
        println!("  Kind: video");
        println!("\nInput is valid. Video decoding requires a pose backend for this format.");
    } else {
        println!("  Kind: pose track");
        println!("\nInput is valid.");
    }

    Ok(())
}
