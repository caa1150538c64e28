// src/utils/normalize.rs

use crate::models::question::{
    AnswerKeyOrigin, BackendQuestion, CanonicalQuestion, CorrectAnswer, Difficulty,
};

/// Resolves the backend's correct-answer field to an option index.
///
/// * Numeric keys are taken as-is (no upper bound check).
/// * Text keys match the first option equal after trimming and lower-casing.
/// * Anything else (fractional numbers, booleans, lists) falls back to index 0 so one malformed question never
///   blocks the rest of the result page.
pub fn resolve_correct_index(
    correct_answer: Option<&CorrectAnswer>,
    options: &[String],
) -> (usize, AnswerKeyOrigin) {
    match correct_answer {
        Some(CorrectAnswer::Index(i)) => match usize::try_from(*i) {
            Ok(index) => (index, AnswerKeyOrigin::Index),
            Err(_) => (0, AnswerKeyOrigin::Defaulted),
        },
        Some(CorrectAnswer::Text(text)) if !text.is_empty() => {
            let wanted = text.trim().to_lowercase();
            options
                .iter()
                .position(|opt| opt.trim().to_lowercase() == wanted)
                .map(|index| (index, AnswerKeyOrigin::Text))
                .unwrap_or((0, AnswerKeyOrigin::Defaulted))
        }
        _ => (0, AnswerKeyOrigin::Defaulted),
    }
}

/// Converts one backend question into its canonical form.
pub fn normalize_question(question: &BackendQuestion) -> CanonicalQuestion {
    let (correct_option_index, answer_key) =
        resolve_correct_index(question.correct_answer.as_ref(), &question.options);

    match answer_key {
        AnswerKeyOrigin::Defaulted => tracing::warn!(
            "Question {}: correct answer {:?} not found in options, assuming index 0",
            question.id,
            question.correct_answer
        ),
        _ => tracing::debug!(
            "Question {}: {:?} -> index {}",
            question.id,
            question.correct_answer,
            correct_option_index
        ),
    }

    CanonicalQuestion {
        id: question.id,
        text: question.question_text.clone(),
        options: question.options.clone(),
        correct_option_index,
        difficulty: Difficulty::from_label(question.difficulty.as_deref()),
        answer_key,
    }
}

pub fn normalize_questions(questions: &[BackendQuestion]) -> Vec<CanonicalQuestion> {
    questions.iter().map(normalize_question).collect()
}
