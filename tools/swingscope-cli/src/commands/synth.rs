//! Write a synthetic swing track.

use std::path::PathBuf;

use swingscope_analysis_engine::SyntheticSwing;

pub fn run(
    out: PathBuf,
    frames: usize,
    fps: f64,
    head_sway: f64,
    dropout_every: usize,
) -> anyhow::Result<()> {
    if frames == 0 {
        anyhow::bail!("--frames must be at least 1");
    }
    if !(fps > 0.0) {
        anyhow::bail!("--fps must be positive");
    }

    let swing = SyntheticSwing {
        frames,
        fps,
        head_sway,
        dropout_every,
        ..Default::default()
    };
    let written = swing
        .write_track(out.clone())
        .map_err(|e| anyhow::anyhow!("Failed to write track: {e}"))?;

    println!("Wrote {written} frames to: {}", out.display());
    println!("  Duration: {:.2}s @ {fps}fps", swing.info().duration_secs());
    Ok(())
}
