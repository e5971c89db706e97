//! SmileCount Core
//!
//! Turns a stream of per-frame blendshape detections into per-face smile
//! scores and smile event counts:
//! - **Frame Processor:** Extracts one smile score per detected face
//! - **Smile Tracker:** Debounced rising-edge counter per positional face slot
//! - **Session:** Drives a detection source one frame per tick
//!
//! Faces are tracked by their position in the detector's output. A face
//! that changes position between frames is attributed to whichever slot
//! it lands in; re-identification would sit in front of the processor.

pub mod frame_processor;
pub mod session;
pub mod shared;
pub mod source;
pub mod tracker;

pub use frame_processor::{FrameProcessor, FrameReport};
pub use session::{Session, SessionState, SessionStats, SessionSummary, TickOutcome};
pub use shared::SharedTracker;
pub use source::{DetectionSource, FramePoll, ReplaySource};
pub use tracker::{FaceSlot, SmileTracker, TrackerOptions};
