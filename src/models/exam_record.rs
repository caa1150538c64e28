// src/models/exam_record.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::models::question::{BackendQuestion, deserialize_questions_lenient};

/// Pass/fail verdict as reported by the exam API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    #[serde(alias = "PASS", alias = "pass")]
    Pass,
    #[serde(alias = "FAIL", alias = "fail")]
    Fail,
}

/// Accepts counts sent either as JSON numbers or as numeric strings.
/// The exam API has been seen sending `correctAnswers` as a string.
fn deserialize_count_flexible<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountRepr {
        Int(u64),
        Float(f64),
        String(String),
    }

    let out_of_range = |v: &dyn std::fmt::Display| -> D::Error {
        serde::de::Error::custom(format!("Count out of range: {}", v))
    };

    match CountRepr::deserialize(deserializer)? {
        CountRepr::Int(i) => u32::try_from(i).map_err(|_| out_of_range(&i)),
        CountRepr::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        CountRepr::Float(f) => Err(out_of_range(&f)),
        CountRepr::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| serde::de::Error::custom(format!("Invalid count string: {}", s))),
    }
}

/// Aggregate figures computed by the exam API on submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_counts"))]
pub struct ResultSummary {
    #[serde(deserialize_with = "deserialize_count_flexible")]
    pub total_questions: u32,

    #[serde(deserialize_with = "deserialize_count_flexible")]
    pub correct_answers: u32,

    #[serde(deserialize_with = "deserialize_count_flexible")]
    pub incorrect_answers: u32,

    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage: f64,

    pub result_status: ResultStatus,
}

fn validate_counts(summary: &ResultSummary) -> Result<(), ValidationError> {
    let answered = u64::from(summary.correct_answers) + u64::from(summary.incorrect_answers);
    if answered > u64::from(summary.total_questions) {
        return Err(ValidationError::new("answered_exceeds_total"));
    }
    Ok(())
}

/// DTO for handing a just-finished attempt to the result service.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    #[validate(nested)]
    pub result: ResultSummary,

    /// Chosen option index per question, `null` when skipped.
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub answers: Vec<Option<usize>>,

    #[validate(length(max = 1000))]
    #[serde(default, deserialize_with = "deserialize_questions_lenient")]
    pub questions: Vec<BackendQuestion>,

    #[validate(length(max = 200))]
    #[serde(default)]
    pub exam_title: Option<String>,

    /// Seconds spent in the exam.
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub time_spent: f64,
}

/// A freshly completed attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSubmissionResult {
    pub exam_id: String,
    pub result: ResultSummary,
    pub answers: Vec<Option<usize>>,
    pub questions: Vec<BackendQuestion>,
    pub exam_title: Option<String>,
    pub time_spent: f64,
    pub submitted_at: DateTime<Utc>,
}

impl RawSubmissionResult {
    pub fn from_request(exam_id: &str, req: SubmitResultRequest) -> Self {
        Self {
            exam_id: exam_id.to_string(),
            result: req.result,
            answers: req.answers,
            questions: req.questions,
            exam_title: req.exam_title,
            time_spent: req.time_spent,
            submitted_at: Utc::now(),
        }
    }

    /// The record persisted for this attempt. Questions are not stored;
    /// they are fetched again on the next visit.
    pub fn to_record(&self) -> PersistedResultRecord {
        PersistedResultRecord {
            exam_id: self.exam_id.clone(),
            result: self.result.clone(),
            answers: self.answers.clone(),
            exam_title: self.exam_title.clone(),
            time_spent: self.time_spent,
            timestamp: self.submitted_at,
        }
    }
}

/// The unit stored per exam id in the result store (JSON, camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedResultRecord {
    pub exam_id: String,
    pub result: ResultSummary,
    pub answers: Vec<Option<usize>>,
    #[serde(default)]
    pub exam_title: Option<String>,
    #[serde(default)]
    pub time_spent: f64,
    pub timestamp: DateTime<Utc>,
}

/// Synthetic placeholder shown when no real attempt is available.
/// Carries raw answers and questions only, so statistics are recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackSample {
    pub exam_id: String,
    pub exam_title: String,
    pub questions: Vec<BackendQuestion>,
    pub answers: Vec<Option<usize>>,
    pub time_spent: f64,
}

/// Which channel the authoritative result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Submission,
    Cache,
    Fallback,
}

/// Exactly one authoritative result per view.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedResult {
    FromSubmission(RawSubmissionResult),
    FromCache(PersistedResultRecord),
    FromFallback(FallbackSample),
}

/// The shape shared by all three sources. Downstream code reads only this.
#[derive(Debug, Clone, Copy)]
pub struct ResultView<'a> {
    pub source: ResultSource,
    pub exam_id: &'a str,
    pub exam_title: Option<&'a str>,
    pub summary: Option<&'a ResultSummary>,
    pub answers: &'a [Option<usize>],
    pub questions: &'a [BackendQuestion],
    pub time_spent: f64,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResolvedResult {
    pub fn source(&self) -> ResultSource {
        match self {
            ResolvedResult::FromSubmission(_) => ResultSource::Submission,
            ResolvedResult::FromCache(_) => ResultSource::Cache,
            ResolvedResult::FromFallback(_) => ResultSource::Fallback,
        }
    }

    pub fn view(&self) -> ResultView<'_> {
        match self {
            ResolvedResult::FromSubmission(s) => ResultView {
                source: ResultSource::Submission,
                exam_id: &s.exam_id,
                exam_title: s.exam_title.as_deref(),
                summary: Some(&s.result),
                answers: &s.answers,
                questions: &s.questions,
                time_spent: s.time_spent,
                completed_at: Some(s.submitted_at),
            },
            ResolvedResult::FromCache(r) => ResultView {
                source: ResultSource::Cache,
                exam_id: &r.exam_id,
                exam_title: r.exam_title.as_deref(),
                summary: Some(&r.result),
                answers: &r.answers,
                questions: &[],
                time_spent: r.time_spent,
                completed_at: Some(r.timestamp),
            },
            ResolvedResult::FromFallback(f) => ResultView {
                source: ResultSource::Fallback,
                exam_id: &f.exam_id,
                exam_title: Some(&f.exam_title),
                summary: None,
                answers: &f.answers,
                questions: &f.questions,
                time_spent: f.time_spent,
                completed_at: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_json(correct: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "totalQuestions": 10,
            "correctAnswers": correct,
            "incorrectAnswers": 2,
            "percentage": 70.0,
            "resultStatus": "Pass"
        })
    }

    #[test]
    fn summary_accepts_string_counts() {
        let s: ResultSummary = serde_json::from_value(summary_json(serde_json::json!("7"))).unwrap();
        assert_eq!(s.correct_answers, 7);
        assert_eq!(s.result_status, ResultStatus::Pass);
    }

    #[test]
    fn summary_rejects_garbage_counts() {
        let res: Result<ResultSummary, _> =
            serde_json::from_value(summary_json(serde_json::json!("seven")));
        assert!(res.is_err());
        let res: Result<ResultSummary, _> =
            serde_json::from_value(summary_json(serde_json::json!(-1)));
        assert!(res.is_err());
    }

    #[test]
    fn summary_validation_catches_impossible_counts() {
        let mut s: ResultSummary = serde_json::from_value(summary_json(serde_json::json!(7))).unwrap();
        assert!(s.validate().is_ok());

        s.correct_answers = 9;
        assert!(s.validate().is_err());

        s.correct_answers = 7;
        s.percentage = 140.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn request_keeps_good_questions_next_to_a_bad_one() {
        let req: SubmitResultRequest = serde_json::from_value(serde_json::json!({
            "result": summary_json(serde_json::json!(7)),
            "answers": [1, 0],
            "questions": [
                { "id": 1, "questionText": null, "options": null, "correctAnswer": 1.0 },
                { "id": 2, "questionText": "Q2", "options": ["x", "y"], "correctAnswer": "x" }
            ]
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.questions.len(), 2);
        assert_eq!(req.questions[1].options, vec!["x", "y"]);
    }

    #[test]
    fn request_without_result_summary_is_rejected() {
        let res: Result<SubmitResultRequest, _> = serde_json::from_value(serde_json::json!({
            "answers": [1, 0],
            "questions": []
        }));
        assert!(res.is_err());
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let s: ResultSummary = serde_json::from_value(summary_json(serde_json::json!(7))).unwrap();
        let sub = RawSubmissionResult {
            exam_id: "42".to_string(),
            result: s,
            answers: vec![Some(0), None],
            questions: vec![],
            exam_title: Some("Mock".to_string()),
            time_spent: 120.0,
            submitted_at: Utc::now(),
        };
        let value = serde_json::to_value(sub.to_record()).unwrap();
        assert_eq!(value["examId"], "42");
        assert_eq!(value["result"]["totalQuestions"], 10);
        assert_eq!(value["answers"], serde_json::json!([0, null]));
        assert_eq!(value["timeSpent"], 120.0);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn cache_view_carries_no_questions() {
        let s: ResultSummary = serde_json::from_value(summary_json(serde_json::json!(7))).unwrap();
        let record = PersistedResultRecord {
            exam_id: "42".to_string(),
            result: s,
            answers: vec![Some(1)],
            exam_title: None,
            time_spent: 30.0,
            timestamp: Utc::now(),
        };
        let resolved = ResolvedResult::FromCache(record);
        let view = resolved.view();
        assert_eq!(view.source, ResultSource::Cache);
        assert!(view.summary.is_some());
        assert!(view.questions.is_empty());
        assert_eq!(view.answers, &[Some(1)]);
    }
}
