// src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use url::Url;

/// Prefix of every persisted result key (`exam_result_<exam id>`).
pub const RESULT_KEY_PREFIX: &str = "exam_result_";

/// Minimum score (percent) for a recomputed result to count as a pass.
pub const PASSING_SCORE_PERCENTAGE: u32 = 60;

pub const DEFAULT_EXAM_API_URL: &str = "https://olympiad-zynlogic.hardikgarg.me/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// When set, results are persisted in Postgres instead of the file store.
    pub database_url: Option<String>,
    pub result_store_dir: PathBuf,
    /// Base URL of the exam API used to fetch question detail.
    pub exam_api_url: Url,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let result_store_dir = env::var("RESULT_STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/results"));

        let exam_api_url = env::var("EXAM_API_URL")
            .unwrap_or_else(|_| DEFAULT_EXAM_API_URL.to_string());
        let exam_api_url = Url::parse(&exam_api_url).expect("EXAM_API_URL must be a valid URL");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            port,
            database_url,
            result_store_dir,
            exam_api_url,
            rust_log,
        }
    }
}
