// src/services/feedback.rs

use crate::models::report::{Feedback, FeedbackTier};

/// Lower score bound (inclusive) of each tier, best tier first.
/// Every score in 0..=100 lands in exactly one tier.
const TIER_THRESHOLDS: [(u32, FeedbackTier); 4] = [
    (90, FeedbackTier::Excellent),
    (75, FeedbackTier::Good),
    (50, FeedbackTier::Satisfactory),
    (0, FeedbackTier::NeedsImprovement),
];

pub fn tier_for(score_percent: u32) -> FeedbackTier {
    TIER_THRESHOLDS
        .iter()
        .find(|(min, _)| score_percent >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(FeedbackTier::NeedsImprovement)
}

/// Feedback text and recommended next steps for a score.
pub fn derive_feedback(score_percent: u32) -> Feedback {
    let tier = tier_for(score_percent);
    let (label, message, next_steps) = match tier {
        FeedbackTier::Excellent => (
            "Excellent",
            "Outstanding work! You have a strong command of this material.",
            vec![
                "Attempt an advanced-level mock test",
                "Review the few questions you missed",
                "Help classmates by explaining difficult topics",
            ],
        ),
        FeedbackTier::Good => (
            "Good",
            "Good job! You understand most of the concepts tested.",
            vec![
                "Revise the topics behind your incorrect answers",
                "Practice timed sections to improve speed",
                "Take another mock test to consolidate",
            ],
        ),
        FeedbackTier::Satisfactory => (
            "Satisfactory",
            "You have a basic grasp of the material, with room to grow.",
            vec![
                "Go through the question review carefully",
                "Re-study the chapters where you lost marks",
                "Practice similar questions daily",
                "Retake this mock test in a week",
            ],
        ),
        FeedbackTier::NeedsImprovement => (
            "Needs Improvement",
            "This topic needs more attention. Keep practicing!",
            vec![
                "Review the fundamentals of each topic",
                "Work through solved examples before attempting tests",
                "Ask an instructor for help with difficult concepts",
                "Retake the mock test after revision",
            ],
        ),
    };

    Feedback {
        tier,
        label,
        message,
        next_steps,
    }
}

/// Letter grade shown next to a score.
pub fn grade_for(score_percent: f64) -> &'static str {
    match score_percent {
        s if s >= 90.0 => "A+",
        s if s >= 80.0 => "A",
        s if s >= 70.0 => "B+",
        s if s >= 60.0 => "B",
        s if s >= 50.0 => "C",
        _ => "F",
    }
}
