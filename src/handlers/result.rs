// src/handlers/result.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::exam_record::{RawSubmissionResult, SubmitResultRequest},
    services::report::{build_history, build_report},
    state::AppState,
    store::ResultStore,
    utils::{exam_id::validate_exam_id, html::clean_title},
};

/// Accepts a just-finished attempt and returns its result report.
///
/// * Validates the exam id and payload.
/// * Persists the attempt (write-through) before computing statistics.
/// * Fetches question detail only if the payload carried no questions.
pub async fn submit_result(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    Json(req): Json<SubmitResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_exam_id(&exam_id)?;
    req.validate()?;

    let mut submission = RawSubmissionResult::from_request(&exam_id, req);
    submission.exam_title = submission
        .exam_title
        .as_deref()
        .map(clean_title)
        .filter(|t| !t.is_empty());

    let report = build_report(
        &state.store,
        &state.enricher,
        state.leaderboard.as_ref(),
        &exam_id,
        Some(submission),
    )
    .await;

    Ok((StatusCode::CREATED, Json(report)))
}

/// Returns the result report for a revisit (stored result, else a sample).
pub async fn get_result(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_exam_id(&exam_id)?;

    let report = build_report(
        &state.store,
        &state.enricher,
        state.leaderboard.as_ref(),
        &exam_id,
        None,
    )
    .await;

    Ok(Json(report))
}

/// Lists every stored result, newest first, with aggregate figures.
pub async fn list_results(State(store): State<ResultStore>) -> Result<impl IntoResponse, AppError> {
    let records = store.list().await;
    Ok(Json(build_history(records)))
}
