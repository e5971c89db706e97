//! Session lifecycle: one tracker, one detection source, one frame per tick.
//!
//! The session owns the slot collection from start to [`Session::finish`].
//! All tracker mutation happens inside [`Session::tick`], so a caller that
//! reads [`Session::snapshot`] between ticks never observes a partial frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use smilecount_common::clock::{FrameBudget, RateController, SessionClock};
use smilecount_common::error::{SmileError, SmileResult};
use smilecount_face_model::snapshot::SlotSnapshot;

use crate::frame_processor::{FrameProcessor, FrameReport};
use crate::source::{DetectionSource, FramePoll};
use crate::tracker::{SmileTracker, TrackerOptions};

/// State of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Accepting frames.
    Running,
    /// Source exhausted or a fatal error occurred.
    Stopped,
}

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// A new frame went through the processor.
    Processed(FrameReport),
    /// The frame repeated the previous video time and was ignored.
    Duplicate,
    /// Detection failed for this frame; nothing was updated.
    Failed,
    /// No frame was ready.
    Idle,
    /// The source is exhausted.
    Ended,
}

/// Running counters for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames_processed: u64,
    pub duplicate_frames: u64,
    pub failed_frames: u64,
    pub faces_skipped: u64,
    pub smile_events: u64,
}

/// Final state returned when a session ends.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub source: String,
    pub started_at: String,
    pub elapsed_secs: f64,
    pub threshold: f64,
    pub stats: SessionStats,
    pub slots: Vec<SlotSnapshot>,
}

/// A live smile counting session.
pub struct Session<S: DetectionSource> {
    source: S,
    tracker: SmileTracker,
    processor: FrameProcessor,
    clock: SessionClock,
    state: SessionState,
    last_video_time: Option<f64>,
    stats: SessionStats,
}

impl<S: DetectionSource> Session<S> {
    /// Initialize `source` and create an empty tracker.
    ///
    /// Fails with [`SmileError::UpstreamUnavailable`] if the source cannot
    /// start, or [`SmileError::Config`] for invalid options. Not retried.
    pub fn start(source: S, options: TrackerOptions) -> SmileResult<Self> {
        Self::start_with_budget(source, options, FrameBudget::default())
    }

    /// Like [`Session::start`], warning when a frame overruns `budget`.
    pub fn start_with_budget(
        mut source: S,
        options: TrackerOptions,
        budget: FrameBudget,
    ) -> SmileResult<Self> {
        let tracker = SmileTracker::new(options)?;

        if let Err(e) = source.initialize() {
            let err = if e.is_fatal() {
                e
            } else {
                SmileError::upstream_unavailable(format!("{}: {e}", source.name()))
            };
            tracing::error!(source = %source.name(), error = %err, "Detection source unavailable");
            return Err(err);
        }

        tracing::info!(
            source = %source.name(),
            threshold = options.threshold,
            "Smile session started"
        );

        Ok(Self {
            source,
            tracker,
            processor: FrameProcessor::new(budget),
            clock: SessionClock::start(),
            state: SessionState::Running,
            last_video_time: None,
            stats: SessionStats::default(),
        })
    }

    /// Consume at most one frame from the source.
    ///
    /// Per-frame failures are logged and reported as [`TickOutcome::Failed`];
    /// only a fatal source error is returned.
    pub fn tick(&mut self) -> SmileResult<TickOutcome> {
        if self.state == SessionState::Stopped {
            return Ok(TickOutcome::Ended);
        }

        let frame = match self.source.poll() {
            Ok(FramePoll::Frame(frame)) => frame,
            Ok(FramePoll::Pending) => return Ok(TickOutcome::Idle),
            Ok(FramePoll::Exhausted) => {
                self.state = SessionState::Stopped;
                tracing::debug!(source = %self.source.name(), "Detection source exhausted");
                return Ok(TickOutcome::Ended);
            }
            Err(e) if e.is_fatal() => {
                self.state = SessionState::Stopped;
                tracing::error!(error = %e, "Detection source lost");
                return Err(e);
            }
            Err(e) => {
                self.stats.failed_frames += 1;
                tracing::warn!(error = %e, "Detection failed, skipping frame");
                return Ok(TickOutcome::Failed);
            }
        };

        let video_time = frame.video_time();
        if self.last_video_time == Some(video_time) {
            self.stats.duplicate_frames += 1;
            return Ok(TickOutcome::Duplicate);
        }

        let report = self.processor.process(&mut self.tracker, &frame.result);
        self.last_video_time = Some(video_time);

        self.stats.frames_processed += 1;
        self.stats.faces_skipped += report.skipped.len() as u64;
        self.stats.smile_events += report.rising_edges as u64;
        tracing::trace!(
            frame = self.stats.frames_processed,
            faces = report.faces,
            updated = report.updated,
            "Frame processed"
        );

        Ok(TickOutcome::Processed(report))
    }

    /// Tick until the source is exhausted.
    pub fn run_to_end(&mut self) -> SmileResult<()> {
        loop {
            match self.tick()? {
                TickOutcome::Ended => return Ok(()),
                TickOutcome::Idle => std::thread::yield_now(),
                _ => {}
            }
        }
    }

    /// Tick at `fps` until the source ends or `stop_flag` is set.
    ///
    /// `on_tick` runs after every tick with the outcome and the tracker,
    /// from the same task, so it can render without extra locking.
    pub async fn run<F>(
        &mut self,
        stop_flag: Arc<AtomicBool>,
        fps: u32,
        mut on_tick: F,
    ) -> SmileResult<()>
    where
        F: FnMut(&TickOutcome, &SmileTracker),
    {
        let mut rate = RateController::new(fps);

        while !stop_flag.load(Ordering::Relaxed) {
            let now = self.clock.elapsed_ns();
            if !rate.should_tick(now) {
                tokio::time::sleep(rate.until_next(now)).await;
                continue;
            }

            let outcome = self.tick()?;
            on_tick(&outcome, &self.tracker);
            if matches!(outcome, TickOutcome::Ended) {
                break;
            }
        }

        tracing::info!(
            frames = self.stats.frames_processed,
            smiles = self.stats.smile_events,
            "Smile session loop stopped"
        );
        Ok(())
    }

    /// Current `(index, score, count)` for every known slot.
    pub fn snapshot(&self) -> Vec<SlotSnapshot> {
        self.tracker.snapshot()
    }

    pub fn tracker(&self) -> &SmileTracker {
        &self.tracker
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// End the session, discarding its slots.
    pub fn finish(self) -> SessionSummary {
        tracing::info!(
            frames = self.stats.frames_processed,
            slots = self.tracker.len(),
            smiles = self.tracker.total_count(),
            "Smile session finished"
        );
        SessionSummary {
            source: self.source.name().to_string(),
            started_at: self.clock.epoch_wall().to_string(),
            elapsed_secs: self.clock.elapsed_secs(),
            threshold: self.tracker.threshold(),
            stats: self.stats,
            slots: self.tracker.snapshot(),
        }
    }
}
