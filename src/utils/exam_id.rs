// src/utils/exam_id.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static EXAM_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid exam id regex"));

/// Exam ids end up in storage keys and file names, so only a safe
/// character set is accepted.
pub fn is_valid_exam_id(exam_id: &str) -> bool {
    EXAM_ID_RE.is_match(exam_id)
}

pub fn validate_exam_id(exam_id: &str) -> Result<(), AppError> {
    if is_valid_exam_id(exam_id) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid exam id: {}", exam_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_slug_ids() {
        assert!(is_valid_exam_id("42"));
        assert!(is_valid_exam_id("mock-test_2024"));
    }

    #[test]
    fn rejects_path_like_ids() {
        assert!(!is_valid_exam_id(""));
        assert!(!is_valid_exam_id("../etc"));
        assert!(!is_valid_exam_id("a/b"));
        assert!(!is_valid_exam_id("has space"));
        assert!(!is_valid_exam_id(&"x".repeat(65)));
    }
}
