//! Analyze a pose track and report the swing.

use std::path::PathBuf;

use swingscope_analysis_engine::{AnalysisReport, AnalysisService, ReplayBackend, Settings};
use swingscope_processing_core::geometry::format_angle;
use swingscope_processing_core::StrategyKind;

/// Command-line overrides applied on top of the loaded settings.
pub struct Options {
    pub strategy: Option<StrategyKind>,
    pub max_frames: Option<usize>,
    pub include_frames: bool,
    pub json: bool,
    pub output: Option<PathBuf>,
}

pub async fn run(track: PathBuf, mut settings: Settings, options: Options) -> anyhow::Result<()> {
    if let Some(strategy) = options.strategy {
        settings.analysis.strategy = strategy;
    }
    if let Some(max_frames) = options.max_frames {
        settings.video.max_frames = max_frames;
    }
    settings.analysis.include_frames |= options.include_frames;

    let service = AnalysisService::new(settings, ReplayBackend)
        .map_err(|e| anyhow::anyhow!("Invalid settings: {e}"))?;

    if !options.json {
        println!("Analyzing swing at: {}", track.display());
    }
    let report = service
        .analyze_file(&track)
        .await
        .map_err(|e| anyhow::anyhow!("Analysis failed: {e}"))?;

    if let Some(ref output) = options.output {
        std::fs::write(output, report.to_json(true)?)?;
        tracing::info!(path = %output.display(), "Report written");
    }

    if options.json {
        println!("{}", report.to_json(true)?);
    } else {
        print_report(&report);
        if let Some(ref output) = options.output {
            println!("\nReport saved to: {}", output.display());
        }
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!(
        "  Frames: {} analyzed ({} read, {} rejected)",
        report.frame_count, report.frames_read, report.frames_rejected
    );
    println!("  Strategy: {}", report.strategy);
    println!();

    println!("Key frames:");
    for (phase, index) in report.key_frames.iter() {
        match index {
            Some(index) => println!("  {phase}: {index}"),
            None => println!("  {phase}: not found"),
        }
    }
    println!();

    let m = &report.metrics;
    println!("Metrics:");
    println!("  Shoulder rotation: {}", format_angle(m.shoulder_rotation));
    println!("  Hip rotation: {}", format_angle(m.hip_rotation));
    println!("  Head movement: {:.3}", m.head_movement);
    match m.tempo_ratio {
        Some(tempo) => println!("  Tempo: {tempo:.2}"),
        None => println!("  Tempo: unavailable"),
    }
    if let Some(angle) = m.impact_angle {
        println!("  Impact arm angle: {}", format_angle(angle));
    }
    println!();

    println!("Checks:");
    for (phase, check, passed) in report.evaluation.outcomes() {
        let mark = if passed { "ok" } else { "FAIL" };
        println!("  [{mark}] {phase}: {check}");
    }
    if let Some(ref error) = report.evaluation.error {
        println!("  Evaluation error: {error}");
    }

    for warning in &report.warnings {
        println!("  Warning: {warning}");
    }

    println!(
        "\nScore: {:.1}% ({}/{} checks passed)",
        report.summary.overall_score, report.summary.passed_checks, report.summary.total_checks
    );
}
