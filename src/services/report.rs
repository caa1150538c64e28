// src/services/report.rs

use crate::{
    models::{
        exam_record::{PersistedResultRecord, RawSubmissionResult},
        report::{HistoryEntry, QuestionReview, ResultHistory, ResultReport},
    },
    services::{
        enricher::QuestionEnricher,
        feedback::{derive_feedback, grade_for},
        leaderboard::LeaderboardService,
        resolver,
        statistics::{self, round_percent},
    },
    store::ResultStore,
};

const UNTITLED: &str = "Test Completed";

/// Runs one full resolution cycle for `exam_id` and assembles the report.
///
/// Resolve (write-through on fresh submissions), enrich questions when the
/// source carries none, then derive statistics, feedback and standing.
/// Never fails: every missing piece degrades to a default.
pub async fn build_report(
    store: &ResultStore,
    enricher: &QuestionEnricher,
    leaderboard: &dyn LeaderboardService,
    exam_id: &str,
    submission: Option<RawSubmissionResult>,
) -> ResultReport {
    let resolved = resolver::resolve(store, exam_id, submission).await;
    let view = resolved.view();

    let enrichment = enricher.enrich(exam_id, view.questions).await;

    let stats = statistics::calculate(view.summary, view.answers, &enrichment.questions);
    let result_status = statistics::result_status(view.summary, &stats);
    let standing = leaderboard.standing(exam_id, stats.score_percent).await;

    // Fetched title, then the one carried by the result, then a placeholder
    let exam_title = enrichment
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            view.exam_title
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| UNTITLED.to_string());

    let review = if enrichment.questions.is_empty() {
        None
    } else {
        Some(QuestionReview {
            questions: enrichment.questions,
            answers: view.answers.to_vec(),
        })
    };

    ResultReport {
        exam_id: exam_id.to_string(),
        source: view.source,
        exam_title,
        subject: enrichment.subject,
        result_status,
        grade: grade_for(f64::from(stats.score_percent)),
        completed_at: view.completed_at,
        time_spent: view.time_spent,
        chart: statistics::chart_buckets(&stats),
        feedback: derive_feedback(stats.score_percent),
        statistics: stats,
        standing,
        review,
    }
}

/// Summarizes stored records (already ordered newest first).
pub fn build_history(records: Vec<PersistedResultRecord>) -> ResultHistory {
    let total_exams = records.len();
    let average_score = if total_exams == 0 {
        0
    } else {
        let sum: f64 = records.iter().map(|r| r.result.percentage).sum();
        round_percent(sum / total_exams as f64)
    };
    let best_score = records
        .iter()
        .map(|r| r.result.percentage)
        .fold(0.0, f64::max);

    let results = records
        .into_iter()
        .map(|r| HistoryEntry {
            grade: grade_for(r.result.percentage),
            percentage: r.result.percentage,
            result_status: r.result.result_status,
            exam_id: r.exam_id,
            exam_title: r.exam_title,
            timestamp: r.timestamp,
        })
        .collect();

    ResultHistory {
        total_exams,
        average_score,
        best_score,
        results,
    }
}
