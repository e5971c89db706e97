//! Debounced smile event counting per face slot.
//!
//! Each slot runs a two-state machine over its score stream:
//!
//! ```text
//!   score > threshold, not smiling  ->  count += 1, smiling
//!   score <= threshold              ->  not smiling
//! ```
//!
//! A sustained smile counts once. Any single frame at or below the
//! threshold re-arms the slot; there is no hysteresis band.
//!
//! Slots are positional and append-only. A slot whose index is absent from
//! a frame keeps its last score, flag, and count. If it was smiling when its
//! face left, a different face later appearing there already smiling will
//! not register a new event.

use serde::{Deserialize, Serialize};
use smilecount_common::config::DEFAULT_SMILE_THRESHOLD;
use smilecount_common::error::{SmileError, SmileResult};
use smilecount_face_model::snapshot::SlotSnapshot;

/// Tracker construction options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerOptions {
    /// Scores strictly above this value count as smiling.
    pub threshold: f64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SMILE_THRESHOLD,
        }
    }
}

impl TrackerOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Reject thresholds outside the `[0, 1]` score domain.
    pub fn validate(&self) -> SmileResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(SmileError::config(format!(
                "smile threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// State of one positional face slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceSlot {
    /// Latest smile score seen at this index.
    pub score: f64,
    /// Debounced smiling flag.
    pub is_smiling: bool,
    /// Rising edges observed so far. Never decreases.
    pub count: u64,
}

/// Owns the face slots for one session.
#[derive(Debug, Clone)]
pub struct SmileTracker {
    options: TrackerOptions,
    slots: Vec<FaceSlot>,
}

impl SmileTracker {
    /// Create an empty tracker after validating the options.
    pub fn new(options: TrackerOptions) -> SmileResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            slots: Vec::new(),
        })
    }

    /// Create a tracker with the default 0.4 threshold.
    pub fn with_defaults() -> Self {
        Self {
            options: TrackerOptions::default(),
            slots: Vec::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.options.threshold
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// Grow the slot list so that `face_index` is valid. Never shrinks.
    pub fn ensure_slot(&mut self, face_index: usize) {
        if face_index >= self.slots.len() {
            self.slots.resize(face_index + 1, FaceSlot::default());
        }
    }

    /// Record `score` for the face at `face_index`.
    ///
    /// Returns `true` when this update was a rising edge.
    pub fn update(&mut self, face_index: usize, score: f64) -> bool {
        self.ensure_slot(face_index);
        let threshold = self.options.threshold;
        let slot = &mut self.slots[face_index];
        slot.score = score;

        if score > threshold && !slot.is_smiling {
            slot.count += 1;
            slot.is_smiling = true;
            tracing::debug!(face_index, score, count = slot.count, "Smile started");
            true
        } else {
            if score <= threshold {
                slot.is_smiling = false;
            }
            false
        }
    }

    /// Every known slot as `(index, score, count)`.
    pub fn snapshot(&self) -> Vec<SlotSnapshot> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| SlotSnapshot {
                index,
                score: slot.score,
                count: slot.count,
            })
            .collect()
    }

    pub fn slots(&self) -> &[FaceSlot] {
        &self.slots
    }

    pub fn slot(&self, face_index: usize) -> Option<&FaceSlot> {
        self.slots.get(face_index)
    }

    /// Number of slots, i.e. the most faces seen in one frame so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sum of smile events over all slots.
    pub fn total_count(&self) -> u64 {
        self.slots.iter().map(|s| s.count).sum()
    }
}

impl Default for SmileTracker {
    fn default() -> Self {
        Self::with_defaults()
    }
}
