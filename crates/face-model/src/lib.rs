//! SmileCount Face Model
//!
//! Defines the data contracts crossing the core boundary:
//! - **Blendshapes:** Per-face category scores produced by the landmark model
//! - **Frames:** Timestamped detection results, stored one per JSONL line
//! - **Snapshots:** Per-slot score and smile count handed to renderers
//!
//! All blendshape scores live in the `[0.0, 1.0]` range.

pub mod blendshape;
pub mod frame;
pub mod snapshot;

pub use blendshape::*;
pub use frame::*;
pub use snapshot::*;
