//! Validate a frame stream without running the tracker.

use std::path::PathBuf;

use smilecount_core::frame_processor::smile_score;
use smilecount_face_model::frame::{parse_frames, parse_header};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating frame stream at: {}", path.display());

    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;

    match parse_header(&content) {
        Some(header) => println!(
            "  Header: schema {} from '{}' @ {}fps",
            header.schema_version, header.source, header.fps
        ),
        None => println!("  Header: none"),
    }

    let frames = parse_frames(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse frames: {e}"))?;
    println!("  Frames: {}", frames.len());

    let max_faces = frames
        .iter()
        .map(|f| f.result.face_count())
        .max()
        .unwrap_or(0);
    println!("  Max faces per frame: {max_faces}");

    let mut issues = Vec::new();
    let mut prev_ts = None;
    for (frame_no, frame) in frames.iter().enumerate() {
        if let Some(prev) = prev_ts {
            if frame.timestamp_ns < prev {
                issues.push(format!(
                    "frame {frame_no}: timestamp {} goes backwards",
                    frame.timestamp_ns
                ));
            }
        }
        prev_ts = Some(frame.timestamp_ns);

        for (face_index, face) in frame.result.face_blendshapes.iter().enumerate() {
            if let Err(e) = smile_score(face_index, face) {
                issues.push(format!("frame {frame_no}: {e}"));
            }
        }
    }

    if issues.is_empty() {
        println!("\nFrame stream is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Affected faces will be skipped during replay.",
            issues.len()
        );
    }

    Ok(())
}
