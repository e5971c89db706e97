//! Synthetic frame stream generation.

use std::f64::consts::TAU;
use std::path::PathBuf;

use smilecount_face_model::blendshape::{DetectionResult, FaceBlendshapes};
use smilecount_face_model::frame::{serialize_frames, FrameRecord, FrameStreamHeader};

pub fn run(
    faces: usize,
    frames: usize,
    fps: u32,
    period: usize,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if fps == 0 || period == 0 {
        anyhow::bail!("--fps and --period must be positive");
    }

    let records = generate(faces, frames, fps, period);
    let jsonl = serialize_frames(Some(&FrameStreamHeader::new("synthetic", fps)), &records)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, jsonl)?;
            println!("Wrote {} frames to {}", records.len(), path.display());
        }
        None => print!("{jsonl}"),
    }
    Ok(())
}

/// Sinusoidal smile intensities, phase-shifted per face.
///
/// The last face (when there is more than one) leaves the frame for every
/// third cycle, so replays exercise slots that go stale and come back.
fn generate(faces: usize, frames: usize, fps: u32, period: usize) -> Vec<FrameRecord> {
    let frame_ns = 1_000_000_000 / fps as u64;

    (0..frames)
        .map(|i| {
            let cycle = i / period;
            let visible = if faces > 1 && cycle % 3 == 2 {
                faces - 1
            } else {
                faces
            };

            let blendshapes = (0..visible)
                .map(|face| {
                    let phase = face as f64 / faces.max(1) as f64;
                    let t = i as f64 / period as f64 + phase;
                    let score = 0.45 - 0.4 * (TAU * t).cos();
                    FaceBlendshapes::smile(clamp01(score + 0.03), clamp01(score - 0.03))
                })
                .collect();

            FrameRecord::new(i as u64 * frame_ns, DetectionResult::new(blendshapes))
                .with_video_time(i as f64 / fps as f64)
        })
        .collect()
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
