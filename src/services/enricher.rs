// src/services/enricher.rs

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{
    error::AppError,
    models::question::{BackendQuestion, CanonicalQuestion, ExamDetail},
    utils::normalize::normalize_questions,
};

/// Where full exam detail (questions with answer keys) comes from.
#[async_trait]
pub trait ExamDetailSource: Send + Sync {
    async fn fetch_exam_detail(&self, exam_id: &str) -> Result<ExamDetail, AppError>;
}

/// Exam API client: `GET {base}/matchsets/{id}/details`.
#[derive(Clone)]
pub struct HttpExamDetailSource {
    client: Client,
    base_url: Url,
}

impl HttpExamDetailSource {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn detail_url(&self, exam_id: &str) -> String {
        format!(
            "{}/matchsets/{}/details",
            self.base_url.as_str().trim_end_matches('/'),
            exam_id
        )
    }
}

#[async_trait]
impl ExamDetailSource for HttpExamDetailSource {
    async fn fetch_exam_detail(&self, exam_id: &str) -> Result<ExamDetail, AppError> {
        let url = self.detail_url(exam_id);
        tracing::info!("Fetching exam details from: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BadGateway(format!(
                "Exam API returned status {} for exam {}",
                status, exam_id
            )));
        }

        let detail = response.json::<ExamDetail>().await?;
        Ok(detail)
    }
}

/// Questions ready for review, plus whatever exam metadata was fetched.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub questions: Vec<CanonicalQuestion>,
    pub title: Option<String>,
    pub subject: Option<String>,
}

/// Supplies canonical questions for a result, fetching them only when the
/// caller has none.
#[derive(Clone)]
pub struct QuestionEnricher {
    source: Arc<dyn ExamDetailSource>,
}

impl QuestionEnricher {
    pub fn new(source: Arc<dyn ExamDetailSource>) -> Self {
        Self { source }
    }

    /// * Non-empty `supplied` questions are normalized and used; no fetch.
    /// * Otherwise one fetch by exam id. Any failure yields no questions.
    pub async fn enrich(&self, exam_id: &str, supplied: &[BackendQuestion]) -> Enrichment {
        if !supplied.is_empty() {
            return Enrichment {
                questions: normalize_questions(supplied),
                ..Default::default()
            };
        }

        match self.source.fetch_exam_detail(exam_id).await {
            Ok(detail) => Enrichment {
                questions: normalize_questions(&detail.questions),
                title: detail.title,
                subject: detail.subject,
            },
            Err(e) => {
                tracing::warn!("No question detail for exam {}: {}", exam_id, e);
                Enrichment::default()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::question::CorrectAnswer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Detail source that counts calls and answers from a canned value.
    pub(crate) struct StubSource {
        pub calls: AtomicUsize,
        pub detail: Option<ExamDetail>,
    }

    impl StubSource {
        pub(crate) fn ok(detail: ExamDetail) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), detail: Some(detail) })
        }

        pub(crate) fn failing() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), detail: None })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExamDetailSource for StubSource {
        async fn fetch_exam_detail(&self, exam_id: &str) -> Result<ExamDetail, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.detail
                .clone()
                .ok_or_else(|| AppError::BadGateway(format!("no detail for {}", exam_id)))
        }
    }

    pub(crate) fn question(id: i64, options: &[&str], answer: CorrectAnswer) -> BackendQuestion {
        BackendQuestion {
            id,
            question_text: format!("Question {}", id),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: Some(answer),
            difficulty: None,
        }
    }

    #[tokio::test]
    async fn supplied_questions_skip_the_fetch() {
        let stub = StubSource::ok(ExamDetail::default());
        let enricher = QuestionEnricher::new(stub.clone());
        let supplied = vec![question(1, &["a", "b"], CorrectAnswer::Text("B".into()))];

        let enrichment = enricher.enrich("42", &supplied).await;

        assert_eq!(stub.calls(), 0);
        assert_eq!(enrichment.questions.len(), 1);
        assert_eq!(enrichment.questions[0].correct_option_index, 1);
    }

    #[tokio::test]
    async fn fetched_questions_are_normalized() {
        let stub = StubSource::ok(ExamDetail {
            title: Some("Olympiad Mock".into()),
            subject: Some("Science".into()),
            questions: vec![
                question(1, &["London", "PARIS "], CorrectAnswer::Text("paris".into())),
                question(2, &["x", "y", "z"], CorrectAnswer::Index(2)),
            ],
            ..Default::default()
        });
        let enricher = QuestionEnricher::new(stub.clone());

        let enrichment = enricher.enrich("42", &[]).await;

        assert_eq!(stub.calls(), 1);
        let indices: Vec<usize> = enrichment
            .questions
            .iter()
            .map(|q| q.correct_option_index)
            .collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(enrichment.title.as_deref(), Some("Olympiad Mock"));
        assert_eq!(enrichment.subject.as_deref(), Some("Science"));
    }

    #[tokio::test]
    async fn fetch_failure_yields_no_questions() {
        let stub = StubSource::failing();
        let enricher = QuestionEnricher::new(stub.clone());

        let enrichment = enricher.enrich("42", &[]).await;

        assert_eq!(stub.calls(), 1);
        assert!(enrichment.questions.is_empty());
        assert!(enrichment.title.is_none());
    }

    #[test]
    fn detail_url_tolerates_trailing_slash() {
        let source = HttpExamDetailSource::new(
            Client::new(),
            Url::parse("http://localhost:8080/api/").unwrap(),
        );
        assert_eq!(
            source.detail_url("42"),
            "http://localhost:8080/api/matchsets/42/details"
        );
    }
}
