//! Blendshape classification results.
//!
//! Field names follow the landmark model's JSON result shape
//! (`faceBlendshapes`, `categoryName`) so recorded output can be
//! deserialized without translation.

use serde::{Deserialize, Serialize};

/// Left mouth-corner smile intensity.
pub const MOUTH_SMILE_LEFT: &str = "mouthSmileLeft";

/// Right mouth-corner smile intensity.
pub const MOUTH_SMILE_RIGHT: &str = "mouthSmileRight";

/// A single named expression score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Blendshape name (e.g., "mouthSmileLeft").
    pub category_name: String,

    /// Intensity in [0.0, 1.0].
    pub score: f64,

    /// Position of the category in the model's output head.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Human-readable name, usually empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            category_name: name.into(),
            score,
            index: None,
            display_name: None,
        }
    }
}

/// All blendshape categories reported for one face.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceBlendshapes {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl FaceBlendshapes {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Build a face carrying only the two mouth-corner smile scores.
    pub fn smile(left: f64, right: f64) -> Self {
        Self::new(vec![
            Category::new(MOUTH_SMILE_LEFT, left),
            Category::new(MOUTH_SMILE_RIGHT, right),
        ])
    }

    /// Score of the first category with the given name.
    pub fn score_of(&self, name: &str) -> Option<f64> {
        self.categories
            .iter()
            .find(|c| c.category_name == name)
            .map(|c| c.score)
    }
}

/// Detection output for a single video frame.
///
/// Faces are ordered as the detector reported them; position in
/// `face_blendshapes` is the face index used for slot assignment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    #[serde(default)]
    pub face_blendshapes: Vec<FaceBlendshapes>,
}

impl DetectionResult {
    pub fn new(face_blendshapes: Vec<FaceBlendshapes>) -> Self {
        Self { face_blendshapes }
    }

    /// Convenience constructor from symmetric per-face smile scores.
    pub fn from_smile_scores(scores: &[f64]) -> Self {
        Self::new(
            scores
                .iter()
                .map(|&s| FaceBlendshapes::smile(s, s))
                .collect(),
        )
    }

    pub fn face_count(&self) -> usize {
        self.face_blendshapes.len()
    }
}
