//! Detection sources: whatever turns captured video into per-frame
//! blendshape results.
//!
//! The session only needs two things from a source: a one-time
//! initialization whose failure ends the session, and a non-blocking poll
//! for the next frame.

use std::collections::{HashSet, VecDeque};

use smilecount_common::error::{SmileError, SmileResult};
use smilecount_face_model::frame::FrameRecord;

/// Result of polling a source for its next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FramePoll {
    /// A new frame's detection result.
    Frame(FrameRecord),
    /// No new frame yet.
    Pending,
    /// The source has no more frames.
    Exhausted,
}

/// Trait for detection backends.
pub trait DetectionSource: Send {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Acquire the camera and model. An error here is fatal to the session.
    fn initialize(&mut self) -> SmileResult<()>;

    /// Poll for the next frame. An error skips that frame only.
    fn poll(&mut self) -> SmileResult<FramePoll>;
}

/// Replays recorded frames in order.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    name: String,
    frames: VecDeque<FrameRecord>,
    failing: HashSet<usize>,
    position: usize,
    unavailable: Option<String>,
}

impl ReplaySource {
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self {
            name: "replay".to_string(),
            frames: frames.into(),
            failing: HashSet::new(),
            position: 0,
            unavailable: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make the frames at these zero-based positions fail detection.
    pub fn failing_at(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.failing.extend(positions);
        self
    }

    /// Make initialization fail with the given reason.
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DetectionSource for ReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> SmileResult<()> {
        match &self.unavailable {
            Some(reason) => Err(SmileError::upstream_unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn poll(&mut self) -> SmileResult<FramePoll> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(FramePoll::Exhausted);
        };
        let position = self.position;
        self.position += 1;

        if self.failing.contains(&position) {
            return Err(SmileError::detection_failure(format!(
                "detector rejected frame {position} (t={})",
                frame.timestamp_ns
            )));
        }
        Ok(FramePoll::Frame(frame))
    }
}
