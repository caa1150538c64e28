// src/services/statistics.rs

use crate::{
    config::PASSING_SCORE_PERCENTAGE,
    models::{
        exam_record::{ResultStatus, ResultSummary},
        question::CanonicalQuestion,
        report::{ChartBucket, DisplayStatistics},
    },
};

/// Rounds a percentage to a whole number in 0..=100.
pub fn round_percent(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

fn percent_of(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    round_percent(f64::from(part) / f64::from(whole) * 100.0)
}

/// Computes the displayed figures for a result.
///
/// With a backend `summary` its counts are authoritative. Without one the
/// counts are recomputed by comparing `answers` to the canonical questions.
pub fn calculate(
    summary: Option<&ResultSummary>,
    answers: &[Option<usize>],
    questions: &[CanonicalQuestion],
) -> DisplayStatistics {
    match summary {
        Some(summary) => from_summary(summary),
        None => recompute(answers, questions),
    }
}

fn from_summary(summary: &ResultSummary) -> DisplayStatistics {
    let answered = summary.correct_answers.saturating_add(summary.incorrect_answers);
    // A total below the answered count cannot satisfy the count invariant.
    let total = summary.total_questions.max(answered);
    let score = round_percent(summary.percentage);

    DisplayStatistics {
        total_questions: total,
        answered_questions: answered,
        correct_answers: summary.correct_answers,
        incorrect_answers: summary.incorrect_answers,
        not_answered: total - answered,
        accuracy_percent: score,
        score_percent: score,
    }
}

fn recompute(answers: &[Option<usize>], questions: &[CanonicalQuestion]) -> DisplayStatistics {
    let mut correct = 0u32;
    let mut incorrect = 0u32;
    let mut not_answered = 0u32;

    for (i, question) in questions.iter().enumerate() {
        match answers.get(i).copied().flatten() {
            None => not_answered += 1,
            Some(choice) if choice == question.correct_option_index => correct += 1,
            Some(_) => incorrect += 1,
        }
    }

    let answered = correct + incorrect;
    let total = answered + not_answered;

    DisplayStatistics {
        total_questions: total,
        answered_questions: answered,
        correct_answers: correct,
        incorrect_answers: incorrect,
        not_answered,
        accuracy_percent: percent_of(correct, answered),
        score_percent: percent_of(correct, total),
    }
}

/// The backend verdict when there is one, otherwise derived from the score.
pub fn result_status(summary: Option<&ResultSummary>, stats: &DisplayStatistics) -> ResultStatus {
    match summary {
        Some(summary) => summary.result_status,
        None if stats.score_percent >= PASSING_SCORE_PERCENTAGE => ResultStatus::Pass,
        None => ResultStatus::Fail,
    }
}

pub fn chart_buckets(stats: &DisplayStatistics) -> Vec<ChartBucket> {
    vec![
        ChartBucket { name: "Correct", value: stats.correct_answers, color: "#10B981" },
        ChartBucket { name: "Incorrect", value: stats.incorrect_answers, color: "#EF4444" },
        ChartBucket { name: "Not Answered", value: stats.not_answered, color: "#6B7280" },
    ]
}
