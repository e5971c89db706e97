//! Read-only per-slot view handed to rendering collaborators.

use serde::{Deserialize, Serialize};

/// Latest score and cumulative smile count of one face slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    /// Zero-based positional slot index.
    pub index: usize,
    /// Most recent smile score.
    pub score: f64,
    /// Number of rising edges observed so far.
    pub count: u64,
}

impl SlotSnapshot {
    /// One-based face label as shown to users.
    pub fn label(&self) -> String {
        format!("Face {}", self.index + 1)
    }

    /// "Face N Smile Score: 0.00"
    pub fn score_line(&self) -> String {
        format!("{} Smile Score: {:.2}", self.label(), self.score)
    }

    /// "Face N Smile Count: K"
    pub fn count_line(&self) -> String {
        format!("{} Smile Count: {}", self.label(), self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lines() {
        let snap = SlotSnapshot {
            index: 0,
            score: 0.456,
            count: 3,
        };
        assert_eq!(snap.score_line(), "Face 1 Smile Score: 0.46");
        assert_eq!(snap.count_line(), "Face 1 Smile Count: 3");
    }

    #[test]
    fn test_json_shape() {
        let snap = SlotSnapshot {
            index: 2,
            score: 0.5,
            count: 1,
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"index":2,"score":0.5,"count":1}"#);
    }
}
