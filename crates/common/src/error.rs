//! Error types shared across SmileCount crates.

/// Top-level error type for SmileCount operations.
///
/// Only [`SmileError::UpstreamUnavailable`] ends a session. Every per-frame
/// condition degrades to "no update this frame".
#[derive(Debug, thiserror::Error)]
pub enum SmileError {
    #[error("Face {face_index} is missing blendshape category '{category}'")]
    MissingCategory {
        face_index: usize,
        category: &'static str,
    },

    #[error("Face {face_index} produced a non-finite smile score ({score})")]
    InvalidScore { face_index: usize, score: f64 },

    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("Detection failed: {message}")]
    DetectionFailure { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SmileError.
pub type SmileResult<T> = Result<T, SmileError>;

impl SmileError {
    pub fn missing_category(face_index: usize, category: &'static str) -> Self {
        Self::MissingCategory {
            face_index,
            category,
        }
    }

    pub fn upstream_unavailable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            message: msg.into(),
        }
    }

    pub fn detection_failure(msg: impl Into<String>) -> Self {
        Self::DetectionFailure {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error ends the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }

    /// Whether this error only invalidates a single face in a frame.
    pub fn is_face_local(&self) -> bool {
        matches!(
            self,
            Self::MissingCategory { .. } | Self::InvalidScore { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_upstream_is_fatal() {
        assert!(SmileError::upstream_unavailable("no camera").is_fatal());
        assert!(!SmileError::detection_failure("model threw").is_fatal());
        assert!(!SmileError::missing_category(0, "mouthSmileLeft").is_fatal());
        assert!(!SmileError::config("bad threshold").is_fatal());
    }

    #[test]
    fn test_face_local_errors() {
        assert!(SmileError::missing_category(1, "mouthSmileRight").is_face_local());
        assert!(SmileError::InvalidScore {
            face_index: 0,
            score: f64::NAN
        }
        .is_face_local());
        assert!(!SmileError::detection_failure("boom").is_face_local());
    }

    #[test]
    fn test_missing_category_message() {
        let err = SmileError::missing_category(2, "mouthSmileRight");
        assert_eq!(
            err.to_string(),
            "Face 2 is missing blendshape category 'mouthSmileRight'"
        );
    }
}
