// src/services/resolver.rs

use crate::{
    models::{
        exam_record::{FallbackSample, RawSubmissionResult, ResolvedResult},
        question::{BackendQuestion, CorrectAnswer},
    },
    store::ResultStore,
};

pub const FALLBACK_TITLE: &str = "Sample Result (not a real attempt)";

/// Picks the authoritative result for one view of `exam_id`.
///
/// 1. A fresh submission, written through to the store first.
/// 2. The stored record for the exam.
/// 3. A synthetic sample, so there is always something to render.
pub async fn resolve(
    store: &ResultStore,
    exam_id: &str,
    submission: Option<RawSubmissionResult>,
) -> ResolvedResult {
    if let Some(submission) = submission {
        if let Err(e) = store.put(exam_id, &submission.to_record()).await {
            tracing::warn!("Failed to persist result for exam {}: {}", exam_id, e);
        }
        tracing::info!("Exam {}: using fresh submission", exam_id);
        return ResolvedResult::FromSubmission(submission);
    }

    if let Some(record) = store.get(exam_id).await {
        tracing::info!("Exam {}: using stored result from {}", exam_id, record.timestamp);
        return ResolvedResult::FromCache(record);
    }

    tracing::info!("Exam {}: no result available, using sample", exam_id);
    ResolvedResult::FromFallback(fallback_sample(exam_id))
}

fn sample_question(id: i64, text: &str, options: [&str; 4], answer: CorrectAnswer) -> BackendQuestion {
    BackendQuestion {
        id,
        question_text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: Some(answer),
        difficulty: None,
    }
}

/// Placeholder attempt. It has no aggregate summary, so its statistics are
/// recomputed from the answers below.
pub fn fallback_sample(exam_id: &str) -> FallbackSample {
    let text = |s: &str| CorrectAnswer::Text(s.to_string());

    FallbackSample {
        exam_id: exam_id.to_string(),
        exam_title: FALLBACK_TITLE.to_string(),
        questions: vec![
            sample_question(1, "What is 7 × 8?", ["54", "56", "64", "48"], CorrectAnswer::Index(1)),
            sample_question(
                2,
                "Which planet is known as the Red Planet?",
                ["Venus", "Mars", "Jupiter", "Saturn"],
                text("Mars"),
            ),
            sample_question(
                3,
                "What is the chemical symbol for water?",
                ["H2O", "CO2", "O2", "NaCl"],
                text("H2O"),
            ),
            sample_question(
                4,
                "Who wrote 'Romeo and Juliet'?",
                ["Charles Dickens", "William Shakespeare", "Jane Austen", "Mark Twain"],
                text("William Shakespeare"),
            ),
            sample_question(
                5,
                "What is the square root of 144?",
                ["10", "11", "12", "14"],
                CorrectAnswer::Index(2),
            ),
        ],
        answers: vec![Some(1), Some(1), Some(2), None, Some(2)],
        time_spent: 900.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam_record::{
        PersistedResultRecord, ResultSource, ResultStatus, ResultSummary,
    };
    use crate::store::{KeyValueStore, MemoryStore, result_key};
    use chrono::Utc;
    use std::sync::Arc;

    fn summary(correct: u32) -> ResultSummary {
        ResultSummary {
            total_questions: 10,
            correct_answers: correct,
            incorrect_answers: 10 - correct,
            percentage: f64::from(correct) * 10.0,
            result_status: ResultStatus::Pass,
        }
    }

    fn submission(correct: u32) -> RawSubmissionResult {
        RawSubmissionResult {
            exam_id: "42".to_string(),
            result: summary(correct),
            answers: vec![Some(0); 10],
            questions: vec![],
            exam_title: Some("Fresh".to_string()),
            time_spent: 60.0,
            submitted_at: Utc::now(),
        }
    }

    fn stored(correct: u32) -> PersistedResultRecord {
        PersistedResultRecord {
            exam_id: "42".to_string(),
            result: summary(correct),
            answers: vec![None; 10],
            exam_title: Some("Stored".to_string()),
            time_spent: 30.0,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn submission_beats_cache_and_overwrites_it() {
        let store = ResultStore::in_memory();
        store.put("42", &stored(3)).await.unwrap();

        let fresh = submission(9);
        let resolved = resolve(&store, "42", Some(fresh.clone())).await;

        assert_eq!(resolved, ResolvedResult::FromSubmission(fresh.clone()));
        assert_eq!(store.get("42").await, Some(fresh.to_record()));
    }

    #[tokio::test]
    async fn cache_is_used_without_submission() {
        let store = ResultStore::in_memory();
        let record = stored(6);
        store.put("42", &record).await.unwrap();

        let resolved = resolve(&store, "42", None).await;

        assert_eq!(resolved, ResolvedResult::FromCache(record));
    }

    #[tokio::test]
    async fn revisit_after_submission_reads_the_written_record() {
        let store = ResultStore::in_memory();
        let fresh = submission(7);
        resolve(&store, "42", Some(fresh.clone())).await;

        let revisit = resolve(&store, "42", None).await;

        assert_eq!(revisit, ResolvedResult::FromCache(fresh.to_record()));
    }

    #[tokio::test]
    async fn nothing_available_falls_back_to_sample() {
        let store = ResultStore::in_memory();
        let resolved = resolve(&store, "7", None).await;

        assert_eq!(resolved.source(), ResultSource::Fallback);
        let view = resolved.view();
        assert_eq!(view.exam_title, Some(FALLBACK_TITLE));
        assert!(view.summary.is_none());
        assert_eq!(view.questions.len(), view.answers.len());
    }

    #[tokio::test]
    async fn corrupted_cache_falls_through_to_sample() {
        let backend = Arc::new(MemoryStore::new());
        let store = ResultStore::new(backend.clone());
        backend.put_raw(&result_key("42"), "not json").await.unwrap();

        let resolved = resolve(&store, "42", None).await;

        assert_eq!(resolved.source(), ResultSource::Fallback);
    }
}
