//! Mudra tutorial.
//!
//! Walks the learner through the basic hand gestures. Detections come from
//! an external recognizer; this module only decides what they mean for the
//! tutorial.

pub mod data;
pub mod logic;
pub mod types;

pub use data::{get_mudra, BASIC_MUDRAS};
pub use logic::{best_detection, FeedbackLog, MudraTutorial};
pub use types::{DetectionBatch, FeedbackEntry, FeedbackKind, Mudra, MudraDetection, TutorialEvent};
