//! Integration test: Mudra tutorial progression

use chrono::Utc;
use natya::achievements::data::MUDRA_MASTER;
use natya::achievements::{AchievementCategory, AchievementLedger};
use natya::mudra::{
    DetectionBatch, FeedbackKind, MudraDetection, MudraTutorial, TutorialEvent, BASIC_MUDRAS,
};
use natya::MUDRA_HOLD_MS;

fn hit(label: &str, confidence: f64) -> Vec<MudraDetection> {
    vec![MudraDetection::new(label, confidence)]
}

#[test]
fn test_confident_match_holds_then_advances() {
    let mut tutorial = MudraTutorial::new();
    assert_eq!(tutorial.current().unwrap().name, "pataka");

    let entry = tutorial.observe(&hit("pataka", 0.9), 1_000).unwrap();
    assert_eq!(entry.kind, FeedbackKind::Success);
    assert_eq!(entry.message, "Detected pataka (90.0% confidence)");
    assert!(tutorial.is_correct());

    assert_eq!(tutorial.advance_due(1_000 + MUDRA_HOLD_MS - 1), None);
    assert_eq!(
        tutorial.advance_due(1_000 + MUDRA_HOLD_MS),
        Some(TutorialEvent::Advanced { step: 1 })
    );
    assert_eq!(tutorial.current().unwrap().name, "mushti");
    assert!(!tutorial.is_correct());
}

#[test]
fn test_repeated_detections_do_not_extend_the_hold() {
    let mut tutorial = MudraTutorial::new();
    tutorial.observe(&hit("pataka", 0.9), 0);
    tutorial.observe(&hit("pataka", 0.95), 1_500);

    assert!(tutorial.advance_due(MUDRA_HOLD_MS).is_some());
}

#[test]
fn test_weak_or_wrong_detections_only_give_feedback() {
    let mut tutorial = MudraTutorial::new();

    let weak = tutorial.observe(&hit("pataka", 0.5), 0).unwrap();
    assert_eq!(weak.kind, FeedbackKind::Correction);
    let wrong = tutorial.observe(&hit("mushti", 0.99), 100).unwrap();
    assert_eq!(wrong.kind, FeedbackKind::Success);

    assert!(!tutorial.is_correct());
    assert_eq!(tutorial.advance_due(60_000), None);
    assert_eq!(tutorial.step(), 0);
    assert_eq!(tutorial.current_mudra(), Some("mushti"));
}

#[test]
fn test_best_detection_of_a_batch_wins() {
    let mut tutorial = MudraTutorial::new();
    let batch = vec![
        MudraDetection::new("mushti", 0.4),
        MudraDetection::new("pataka", 0.7),
        MudraDetection::new("trishool", 0.2),
    ];

    let entry = tutorial.observe(&batch, 0).unwrap();
    assert_eq!(entry.kind, FeedbackKind::Improvement);
    assert!(tutorial.is_correct());
}

#[test]
fn test_empty_batch_is_ignored() {
    let mut tutorial = MudraTutorial::new();
    assert_eq!(tutorial.observe(&[], 0), None);
    assert!(tutorial.feedback().is_empty());
}

#[test]
fn test_feedback_keeps_five_newest() {
    let mut tutorial = MudraTutorial::new();
    for i in 0..8u64 {
        tutorial.observe(&hit("mushti", 0.1 * i as f64), i);
    }

    let times: Vec<u64> = tutorial.feedback().iter().map(|e| e.at_ms).collect();
    assert_eq!(times, vec![7, 6, 5, 4, 3]);
    assert_eq!(tutorial.feedback().latest().unwrap().at_ms, 7);
}

#[test]
fn test_skipping_through_completes_and_awards_mudra_master() {
    let mut tutorial = MudraTutorial::new();
    for step in 1..BASIC_MUDRAS.len() {
        assert_eq!(tutorial.skip(), Some(TutorialEvent::Advanced { step }));
    }
    assert!(tutorial.completion_award(Utc::now()).is_none());
    assert_eq!(tutorial.skip(), Some(TutorialEvent::Completed));
    assert!(tutorial.is_completed());
    assert_eq!(tutorial.skip(), None);
    assert_eq!(tutorial.observe(&hit("trishool", 0.9), 0), None);

    let award = tutorial.completion_award(Utc::now()).unwrap();
    assert_eq!(award.name, MUDRA_MASTER.name);
    assert_eq!(award.points, 100);
    assert_eq!(award.category, AchievementCategory::Mudras);
}

#[test]
fn test_holding_every_mudra_completes_tutorial() {
    let mut tutorial = MudraTutorial::new();
    let mut now = 0;
    let mut events = Vec::new();
    for mudra in BASIC_MUDRAS {
        tutorial.observe(&hit(mudra.name, 0.85), now);
        now += MUDRA_HOLD_MS;
        events.extend(tutorial.advance_due(now));
    }

    assert_eq!(events.last(), Some(&TutorialEvent::Completed));
    assert!(tutorial.is_completed());

    let mut ledger = AchievementLedger::new();
    ledger.award(tutorial.completion_award(Utc::now()).unwrap());
    assert_eq!(ledger.count_in(AchievementCategory::Mudras), 1);
}

#[test]
fn test_recognizer_payload_parses() {
    let json = r#"{"detections":[{"label":"sinhamukh","confidence":0.82}]}"#;
    let batch: DetectionBatch = serde_json::from_str(json).unwrap();
    assert_eq!(batch.detections, hit("sinhamukh", 0.82));

    let empty: DetectionBatch = serde_json::from_str("{}").unwrap();
    assert!(empty.detections.is_empty());
}
