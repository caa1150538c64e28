// src/models/report.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    exam_record::{ResultSource, ResultStatus},
    question::CanonicalQuestion,
};

/// Figures shown on the result page.
/// Invariant: `correct + incorrect + not_answered == total`,
/// `answered == correct + incorrect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayStatistics {
    pub total_questions: u32,
    pub answered_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub not_answered: u32,
    pub accuracy_percent: u32,
    pub score_percent: u32,
}

/// One slice of the summary chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBucket {
    pub name: &'static str,
    pub value: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    NeedsImprovement,
    Satisfactory,
    Good,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub tier: FeedbackTier,
    pub label: &'static str,
    pub message: &'static str,
    pub next_steps: Vec<&'static str>,
}

/// Rank figures from the leaderboard collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: u32,
    pub total_participants: u32,
    pub percentile: u32,
    /// True when the figures are an estimate rather than cohort data.
    pub estimated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub questions: Vec<CanonicalQuestion>,
    pub answers: Vec<Option<usize>>,
}

/// Everything the result page renders for one exam attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    pub exam_id: String,
    pub source: ResultSource,
    pub exam_title: String,
    pub subject: Option<String>,
    pub result_status: ResultStatus,
    pub grade: &'static str,
    pub completed_at: Option<DateTime<Utc>>,
    pub time_spent: f64,
    pub statistics: DisplayStatistics,
    pub chart: Vec<ChartBucket>,
    pub feedback: Feedback,
    pub standing: Option<Standing>,
    pub review: Option<QuestionReview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub exam_id: String,
    pub exam_title: Option<String>,
    pub percentage: f64,
    pub result_status: ResultStatus,
    pub grade: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// All stored results, newest first, with aggregate figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultHistory {
    pub total_exams: usize,
    pub average_score: u32,
    pub best_score: f64,
    pub results: Vec<HistoryEntry>,
}
