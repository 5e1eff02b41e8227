//! Mudra tutorial progression driven by recognizer detections.

use super::data::BASIC_MUDRAS;
use super::types::{FeedbackEntry, FeedbackKind, Mudra, MudraDetection, TutorialEvent};
use crate::achievements::data::MUDRA_MASTER;
use crate::achievements::AchievementRecord;
use crate::core::constants::{FEEDBACK_LOG_CAPACITY, MUDRA_HOLD_MS, MUDRA_MATCH_CONFIDENCE};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Most recent feedback first, bounded.
#[derive(Debug, Clone, Default)]
pub struct FeedbackLog {
    entries: VecDeque<FeedbackEntry>,
}

impl FeedbackLog {
    pub fn push(&mut self, entry: FeedbackEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(FEEDBACK_LOG_CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedbackEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&FeedbackEntry> {
        self.entries.front()
    }
}

/// Highest-confidence detection of a batch.
pub fn best_detection(detections: &[MudraDetection]) -> Option<&MudraDetection> {
    detections
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

#[derive(Debug, Clone)]
pub struct MudraTutorial {
    mudras: &'static [Mudra],
    step: usize,
    is_correct: bool,
    advance_at_ms: Option<u64>,
    current_mudra: Option<String>,
    feedback: FeedbackLog,
    completed: bool,
}

impl Default for MudraTutorial {
    fn default() -> Self {
        Self::new()
    }
}

impl MudraTutorial {
    pub fn new() -> Self {
        Self::with_mudras(BASIC_MUDRAS)
    }

    pub fn with_mudras(mudras: &'static [Mudra]) -> Self {
        Self {
            mudras,
            step: 0,
            is_correct: false,
            advance_at_ms: None,
            current_mudra: None,
            feedback: FeedbackLog::default(),
            completed: false,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn current(&self) -> Option<&'static Mudra> {
        self.mudras.get(self.step)
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Label of the last mudra the recognizer reported.
    pub fn current_mudra(&self) -> Option<&str> {
        self.current_mudra.as_deref()
    }

    pub fn feedback(&self) -> &FeedbackLog {
        &self.feedback
    }

    /// Feed one recognizer batch. Logs feedback for the best detection and,
    /// when it matches the current step confidently enough, holds the step
    /// as correct for two seconds before moving on.
    pub fn observe(&mut self, detections: &[MudraDetection], now_ms: u64) -> Option<FeedbackEntry> {
        if self.completed {
            return None;
        }
        let best = best_detection(detections)?;
        let entry = FeedbackEntry {
            at_ms: now_ms,
            message: format!(
                "Detected {} ({:.1}% confidence)",
                best.label,
                best.confidence * 100.0
            ),
            kind: FeedbackKind::classify(best.confidence),
        };
        self.feedback.push(entry.clone());
        self.current_mudra = Some(best.label.clone());

        let matches_step = self.current().is_some_and(|m| m.name == best.label);
        if matches_step && best.confidence > MUDRA_MATCH_CONFIDENCE && self.advance_at_ms.is_none() {
            self.is_correct = true;
            self.advance_at_ms = Some(now_ms + MUDRA_HOLD_MS);
            log::debug!("mudra {} held at step {}", best.label, self.step);
        }
        Some(entry)
    }

    /// Move on once the hold after a correct mudra has elapsed.
    pub fn advance_due(&mut self, now_ms: u64) -> Option<TutorialEvent> {
        match self.advance_at_ms {
            Some(at) if now_ms >= at => {
                self.advance_at_ms = None;
                Some(self.next_step())
            }
            _ => None,
        }
    }

    /// Skip the current mudra; on the last one this completes the tutorial.
    pub fn skip(&mut self) -> Option<TutorialEvent> {
        if self.completed {
            return None;
        }
        self.advance_at_ms = None;
        Some(self.next_step())
    }

    /// Achievement earned by finishing the tutorial.
    pub fn completion_award(&self, now: DateTime<Utc>) -> Option<AchievementRecord> {
        self.completed.then(|| MUDRA_MASTER.earn(now))
    }

    fn next_step(&mut self) -> TutorialEvent {
        self.is_correct = false;
        if self.step + 1 < self.mudras.len() {
            self.step += 1;
            TutorialEvent::Advanced { step: self.step }
        } else {
            self.completed = true;
            log::info!("mudra tutorial completed");
            TutorialEvent::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u64) -> FeedbackEntry {
        FeedbackEntry {
            at_ms: n,
            message: format!("#{}", n),
            kind: FeedbackKind::Improvement,
        }
    }

    #[test]
    fn test_feedback_log_keeps_five_newest() {
        let mut log = FeedbackLog::default();
        for n in 0..8 {
            log.push(entry(n));
        }
        assert_eq!(log.len(), 5);
        let order: Vec<u64> = log.iter().map(|e| e.at_ms).collect();
        assert_eq!(order, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_best_detection_picks_highest_confidence() {
        let batch = vec![
            MudraDetection::new("mushti", 0.4),
            MudraDetection::new("pataka", 0.9),
            MudraDetection::new("trishool", 0.7),
        ];
        assert_eq!(best_detection(&batch).map(|d| d.label.as_str()), Some("pataka"));
        assert!(best_detection(&[]).is_none());
    }

    #[test]
    fn test_feedback_message_format() {
        let mut tutorial = MudraTutorial::new();
        let entry = tutorial
            .observe(&[MudraDetection::new("mushti", 0.654)], 10)
            .unwrap();
        assert_eq!(entry.message, "Detected mushti (65.4% confidence)");
        assert_eq!(entry.kind, FeedbackKind::Improvement);
        assert_eq!(tutorial.current_mudra(), Some("mushti"));
        assert!(!tutorial.is_correct(), "wrong mudra for step 0");
    }

    #[test]
    fn test_low_confidence_match_does_not_hold() {
        let mut tutorial = MudraTutorial::new();
        tutorial.observe(&[MudraDetection::new("pataka", 0.55)], 0);
        assert!(!tutorial.is_correct());
        assert_eq!(tutorial.advance_due(10_000), None);
    }

    #[test]
    fn test_no_award_before_completion() {
        assert!(MudraTutorial::new().completion_award(Utc::now()).is_none());
    }
}
