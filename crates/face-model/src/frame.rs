//! Timestamped frame records and their JSONL encoding.
//!
//! A frame stream is one JSON object per line. An optional first line
//! starting with `# ` carries a [`FrameStreamHeader`]; any other line that
//! is blank or starts with `#` is ignored.

use serde::{Deserialize, Serialize};
use smilecount_common::error::{SmileError, SmileResult};

use crate::blendshape::DetectionResult;

/// Monotonic timestamp in nanoseconds since stream start.
pub type TimestampNs = u64;

/// Current frame stream schema version.
pub const FRAME_SCHEMA_VERSION: &str = "1.0";

/// Metadata written as a comment line ahead of the frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Producer of the stream (model name, "synthetic", ...).
    pub source: String,

    /// Nominal capture frame rate.
    pub fps: u32,
}

impl FrameStreamHeader {
    pub fn new(source: impl Into<String>, fps: u32) -> Self {
        Self {
            schema_version: FRAME_SCHEMA_VERSION.to_string(),
            source: source.into(),
            fps,
        }
    }
}

/// One video frame's detection output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Monotonic nanoseconds since stream start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Playback position of the source video, in seconds.
    ///
    /// Two consecutive records with the same video time describe the same
    /// underlying frame.
    #[serde(
        rename = "videoTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub video_time_secs: Option<f64>,

    /// The detector output.
    #[serde(flatten)]
    pub result: DetectionResult,
}

impl FrameRecord {
    pub fn new(timestamp_ns: TimestampNs, result: DetectionResult) -> Self {
        Self {
            timestamp_ns,
            video_time_secs: None,
            result,
        }
    }

    pub fn with_video_time(mut self, secs: f64) -> Self {
        self.video_time_secs = Some(secs);
        self
    }

    /// Video time identifying this frame, falling back to the timestamp.
    pub fn video_time(&self) -> f64 {
        self.video_time_secs
            .unwrap_or(self.timestamp_ns as f64 / 1_000_000_000.0)
    }
}

/// Parse frames from JSONL content, reporting the 1-based line of the
/// first malformed record.
pub fn parse_frames(jsonl: &str) -> SmileResult<Vec<FrameRecord>> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|e| SmileError::Parse {
                line: line_no,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Read the `# {...}` header line if the stream starts with one.
pub fn parse_header(jsonl: &str) -> Option<FrameStreamHeader> {
    let first = jsonl.lines().map(str::trim).find(|l| !l.is_empty())?;
    let body = first.strip_prefix('#')?.trim();
    serde_json::from_str(body).ok()
}

/// Serialize frames to JSONL, preceded by the header comment if given.
pub fn serialize_frames(
    header: Option<&FrameStreamHeader>,
    frames: &[FrameRecord],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    if let Some(header) = header {
        output.push_str("# ");
        output.push_str(&serde_json::to_string(header)?);
        output.push('\n');
    }
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
