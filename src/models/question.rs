// src/models/question.rs

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Number, Value};

/// The "correct answer" field as the exam API sends it.
/// Some exams store the option text, others the zero-based option index.
/// Whole-number floats count as an index; anything else is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(i64),
    Text(String),
    Other(Value),
}

fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

impl From<Value> for CorrectAnswer {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => CorrectAnswer::Text(s),
            Value::Number(n) => match whole_number(&n) {
                Some(i) => CorrectAnswer::Index(i),
                None => CorrectAnswer::Other(Value::Number(n)),
            },
            other => CorrectAnswer::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for CorrectAnswer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(CorrectAnswer::from)
    }
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Option list where the list itself or single entries may be `null`.
fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let options: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(options
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Optional field that reads as absent when its value has the wrong shape.
fn ignore_malformed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Option<T>>(value).ok().flatten())
}

/// Question list that never fails as a whole.
///
/// An entry that still cannot be read becomes a blank placeholder at the same
/// position, so answers stay aligned with their questions.
pub fn deserialize_questions_lenient<'de, D>(deserializer: D) -> Result<Vec<BackendQuestion>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            serde_json::from_value(entry).unwrap_or_else(|err| {
                tracing::warn!(
                    "Question at position {} is malformed ({}), using a blank placeholder",
                    position,
                    err
                );
                BackendQuestion::placeholder(position)
            })
        })
        .collect())
}

/// A question exactly as returned by the exam API (or carried by a submission).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendQuestion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub question_text: String,

    #[serde(default, deserialize_with = "deserialize_options")]
    pub options: Vec<String>,

    #[serde(default)]
    pub correct_answer: Option<CorrectAnswer>,

    /// Not sent by the current exam API; accepted when present.
    #[serde(default, deserialize_with = "ignore_malformed")]
    pub difficulty: Option<String>,
}

impl BackendQuestion {
    /// Stand-in for an entry that could not be read. `id` is the 1-based position.
    pub fn placeholder(position: usize) -> Self {
        Self {
            id: i64::try_from(position).map_or(0, |p| p + 1),
            question_text: String::new(),
            options: Vec::new(),
            correct_answer: None,
            difficulty: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parses a backend difficulty label, defaulting to `Medium`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("easy") => Difficulty::Easy,
            Some("hard") => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

/// Where a canonical question's correct index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKeyOrigin {
    /// The backend sent a numeric index.
    Index,
    /// The backend sent option text that matched an option.
    Text,
    /// Nothing usable was sent; index 0 was assumed.
    Defaulted,
}

/// A question in the single shape every downstream consumer uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalQuestion {
    pub id: i64,
    pub text: String,
    pub options: Vec<String>,

    /// Zero-based index into `options`.
    /// Numeric keys from the backend are not bounds-checked.
    pub correct_option_index: usize,

    pub difficulty: Difficulty,

    pub answer_key: AnswerKeyOrigin,
}

/// Exam detail payload from `GET /matchsets/{id}/details`.
/// Unknown fields are ignored and malformed metadata reads as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDetail {
    #[serde(default, deserialize_with = "ignore_malformed")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "ignore_malformed")]
    pub subject: Option<String>,

    #[serde(default, deserialize_with = "ignore_malformed")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "ignore_malformed")]
    pub duration_minutes: Option<u32>,

    #[serde(default, deserialize_with = "deserialize_questions_lenient")]
    pub questions: Vec<BackendQuestion>,
}
