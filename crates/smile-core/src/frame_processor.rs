//! Per-frame smile score extraction.
//!
//! Each face's smile score is the mean of its two mouth-corner blendshapes.
//! A face missing either category (or yielding a non-finite score) is
//! skipped for the frame; the rest of the batch still updates.

use std::time::Instant;

use smilecount_common::clock::FrameBudget;
use smilecount_common::error::{SmileError, SmileResult};
use smilecount_face_model::blendshape::{
    DetectionResult, FaceBlendshapes, MOUTH_SMILE_LEFT, MOUTH_SMILE_RIGHT,
};

use crate::tracker::SmileTracker;

/// Smile score of one face: `(mouthSmileLeft + mouthSmileRight) / 2`.
pub fn smile_score(face_index: usize, face: &FaceBlendshapes) -> SmileResult<f64> {
    let left = face
        .score_of(MOUTH_SMILE_LEFT)
        .ok_or_else(|| SmileError::missing_category(face_index, MOUTH_SMILE_LEFT))?;
    let right = face
        .score_of(MOUTH_SMILE_RIGHT)
        .ok_or_else(|| SmileError::missing_category(face_index, MOUTH_SMILE_RIGHT))?;

    let score = (left + right) / 2.0;
    if !score.is_finite() {
        return Err(SmileError::InvalidScore { face_index, score });
    }
    Ok(score)
}

/// A face left out of a frame's update.
#[derive(Debug)]
pub struct SkippedFace {
    pub face_index: usize,
    pub error: SmileError,
}

/// What one call to [`FrameProcessor::process`] did.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Faces reported by the detector.
    pub faces: usize,
    /// Faces whose slot was updated.
    pub updated: usize,
    /// Rising edges produced by this frame.
    pub rising_edges: usize,
    /// Faces skipped, with the reason.
    pub skipped: Vec<SkippedFace>,
}

impl FrameReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Stateless bridge from detection results to tracker updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameProcessor {
    budget: FrameBudget,
}

impl FrameProcessor {
    /// Create a processor that warns when a frame overruns `budget`.
    pub fn new(budget: FrameBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> FrameBudget {
        self.budget
    }

    /// Feed every face of `result`, in order, into `tracker`.
    ///
    /// Every face index in the frame gets a slot, including faces that end
    /// up skipped.
    pub fn process(&self, tracker: &mut SmileTracker, result: &DetectionResult) -> FrameReport {
        let started = Instant::now();
        let mut report = FrameReport {
            faces: result.face_count(),
            ..Default::default()
        };

        if let Some(last_index) = result.face_count().checked_sub(1) {
            tracker.ensure_slot(last_index);
        }

        for (face_index, face) in result.face_blendshapes.iter().enumerate() {
            match smile_score(face_index, face) {
                Ok(score) => {
                    if tracker.update(face_index, score) {
                        report.rising_edges += 1;
                    }
                    report.updated += 1;
                }
                Err(error) => {
                    tracing::warn!(face_index, %error, "Skipping face");
                    report.skipped.push(SkippedFace { face_index, error });
                }
            }
        }

        let elapsed = started.elapsed();
        if self.budget.exceeded(elapsed) {
            tracing::warn!(
                elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                budget_us = u64::try_from(self.budget.budget().as_micros()).unwrap_or(u64::MAX),
                "Frame processing exceeded budget"
            );
        }

        report
    }
}
