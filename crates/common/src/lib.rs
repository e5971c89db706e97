//! SmileCount Common Utilities
//!
//! Shared infrastructure for all SmileCount crates:
//! - Error taxonomy and result alias
//! - Frame clock and rate control for paced frame loops
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
