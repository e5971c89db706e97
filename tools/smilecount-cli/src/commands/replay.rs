//! Replay a recorded frame stream through a smile session.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use smilecount_common::clock::FrameBudget;
use smilecount_core::session::{Session, SessionSummary, TickOutcome};
use smilecount_core::source::ReplaySource;
use smilecount_core::tracker::TrackerOptions;
use smilecount_face_model::frame::{parse_frames, parse_header};
use smilecount_face_model::snapshot::SlotSnapshot;

pub async fn run(
    path: PathBuf,
    threshold: f64,
    json: bool,
    realtime: bool,
    fps: Option<u32>,
    default_fps: u32,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;

    let header = parse_header(&content);
    let frames = parse_frames(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;
    let fps = fps
        .or_else(|| header.as_ref().map(|h| h.fps))
        .unwrap_or(default_fps);

    tracing::info!(frames = frames.len(), fps, threshold, "Replaying frame stream");

    let source = ReplaySource::new(frames).named(path.display().to_string());
    let mut session = Session::start_with_budget(
        source,
        TrackerOptions::with_threshold(threshold),
        FrameBudget::for_fps(fps),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start session: {e}"))?;

    if realtime {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let mut last_printed: Vec<SlotSnapshot> = Vec::new();
        session
            .run(stop_flag, fps, |outcome, tracker| {
                if !matches!(outcome, TickOutcome::Processed(_)) {
                    return;
                }
                let snapshot = tracker.snapshot();
                let changed = snapshot.len() != last_printed.len()
                    || snapshot
                        .iter()
                        .zip(&last_printed)
                        .any(|(now, before)| now.count != before.count);
                if changed && !json {
                    let counts: Vec<String> =
                        snapshot.iter().map(SlotSnapshot::count_line).collect();
                    println!("{}", counts.join("  |  "));
                }
                last_printed = snapshot;
            })
            .await?;
    } else {
        session.run_to_end()?;
    }

    let summary = session.finish();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &SessionSummary) {
    println!("Replayed: {}", summary.source);
    println!("  Threshold: {}", summary.threshold);
    println!("  Frames processed: {}", summary.stats.frames_processed);
    println!("  Duplicate frames: {}", summary.stats.duplicate_frames);
    println!("  Failed frames: {}", summary.stats.failed_frames);
    println!("  Faces skipped: {}", summary.stats.faces_skipped);
    println!();

    if summary.slots.is_empty() {
        println!("No faces detected.");
        return;
    }

    for slot in &summary.slots {
        println!("{}", slot.score_line());
    }
    println!();
    for slot in &summary.slots {
        println!("{}", slot.count_line());
    }
}
