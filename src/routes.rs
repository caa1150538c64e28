// src/routes.rs

use axum::{Router, http::Method, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers::result, state::AppState};

/// Assembles the main application router.
///
/// * Mounts the result routes under `/api/results`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, enricher, leaderboard).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
        "http://localhost:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let result_routes = Router::new()
        .route("/", get(result::list_results))
        .route(
            "/{exam_id}",
            get(result::get_result).post(result::submit_result),
        );

    Router::new()
        .nest("/api/results", result_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
