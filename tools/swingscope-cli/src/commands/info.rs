//! Show pose track information.

use std::path::PathBuf;

use swingscope_analysis_engine::{ReplaySource, VideoSource};

pub fn run(track: PathBuf) -> anyhow::Result<()> {
    let mut source =
        ReplaySource::open(&track).map_err(|e| anyhow::anyhow!("Failed to open track: {e}"))?;
    let info = source.info();

    println!("Track: {}", track.display());
    println!("  Frames: {}", info.frame_count);
    println!("  FPS: {}", info.fps);
    println!("  Duration: {:.2}s", info.duration_secs());
    if info.width > 0 && info.height > 0 {
        println!("  Resolution: {}x{}", info.width, info.height);
    }
    println!();

    let mut frames = 0usize;
    let mut poses = 0usize;
    while let Some(frame) = source.next_frame()? {
        frames += 1;
        if frame.pose.is_some() {
            poses += 1;
        }
    }

    println!("Poses:");
    println!("  Frames stored: {frames}");
    println!("  Frames with a pose: {poses}");
    println!("  Frames without a pose: {}", frames - poses);
    if frames != info.frame_count {
        println!(
            "\nHeader declares {} frames but the track stores {frames}.",
            info.frame_count
        );
    }

    Ok(())
}
