//! Mudra tutorial data structures.

use crate::core::constants::{MUDRA_MATCH_CONFIDENCE, MUDRA_SUCCESS_CONFIDENCE};
use serde::{Deserialize, Serialize};

/// A hand gesture taught by the tutorial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mudra {
    /// Label the external recognizer reports for this gesture.
    pub name: &'static str,
    pub description: &'static str,
    pub key_points: &'static [&'static str],
}

/// One recognizer hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MudraDetection {
    pub label: String,
    /// Recognizer confidence in `[0, 1]`.
    pub confidence: f64,
}

impl MudraDetection {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Payload shape returned by the recognizer endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionBatch {
    #[serde(default)]
    pub detections: Vec<MudraDetection>,
}

/// How a detection is presented to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Improvement,
    Correction,
}

impl FeedbackKind {
    /// `> 0.8` success, `> 0.6` improvement, anything else needs correcting.
    pub fn classify(confidence: f64) -> Self {
        if confidence > MUDRA_SUCCESS_CONFIDENCE {
            FeedbackKind::Success
        } else if confidence > MUDRA_MATCH_CONFIDENCE {
            FeedbackKind::Improvement
        } else {
            FeedbackKind::Correction
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    pub at_ms: u64,
    pub message: String,
    pub kind: FeedbackKind,
}

/// Tutorial progress reported to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialEvent {
    /// Moved on to the mudra at this index.
    Advanced { step: usize },
    /// Every mudra has been done.
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(FeedbackKind::classify(0.95), FeedbackKind::Success);
        assert_eq!(FeedbackKind::classify(0.8), FeedbackKind::Improvement);
        assert_eq!(FeedbackKind::classify(0.61), FeedbackKind::Improvement);
        assert_eq!(FeedbackKind::classify(0.6), FeedbackKind::Correction);
        assert_eq!(FeedbackKind::classify(0.0), FeedbackKind::Correction);
    }

    #[test]
    fn test_batch_parses_recognizer_payload() {
        let batch: DetectionBatch = serde_json::from_str(
            r#"{"detections":[{"label":"pataka","confidence":0.91},{"label":"mushti","confidence":0.2}]}"#,
        )
        .unwrap();
        assert_eq!(batch.detections.len(), 2);
        assert_eq!(batch.detections[0], MudraDetection::new("pataka", 0.91));

        let empty: DetectionBatch = serde_json::from_str("{}").unwrap();
        assert!(empty.detections.is_empty());
    }
}
