//! Parse normalized text and keep only questions that satisfy the quiz invariants.

use serde::Deserialize;
use serde_json::Value;

use crate::core::error::QuizError;

use super::{OPTION_COUNT, QuizQuestion};

/// One entry of `questions` as the model sent it. Fields are checked after deserializing.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Option<Vec<Value>>,
    #[serde(default)]
    correct: Option<Value>,
}

/// Parse `text` and return the valid questions in their original order.
///
/// Invalid questions are dropped (logged at warn). Fails when parsing fails, when `questions` is
/// absent or empty, or when fewer than `min_questions` survive.
pub fn validate(text: &str, min_questions: usize) -> Result<Vec<QuizQuestion>, QuizError> {
    let parsed: Value = serde_json::from_str(text).map_err(|e| {
        log::debug!("Cleaned text that failed to parse: {}", text);
        QuizError::Parse(e)
    })?;

    let entries = parsed
        .get("questions")
        .and_then(Value::as_array)
        .filter(|arr| !arr.is_empty())
        .ok_or(QuizError::MissingQuestionsField)?;

    let mut valid = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        match check_question(entry) {
            Ok(q) => valid.push(q),
            Err(reason) => log::warn!("Dropping question {}: {}", i, reason),
        }
    }

    // Never an empty quiz, whatever the configured minimum.
    let required = min_questions.max(1);
    if valid.len() < required {
        return Err(QuizError::InsufficientQuestions {
            found: valid.len(),
            required,
        });
    }
    Ok(valid)
}

fn check_question(entry: &Value) -> Result<QuizQuestion, String> {
    let raw: RawQuestion =
        serde_json::from_value(entry.clone()).map_err(|e| format!("invalid shape: {}", e))?;

    let question = raw
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or("missing question text")?;

    let options = raw.options.ok_or("missing options")?;
    if options.len() != OPTION_COUNT {
        return Err(format!(
            "expected {} options, got {}",
            OPTION_COUNT,
            options.len()
        ));
    }
    let texts: Vec<String> = options
        .iter()
        .map(option_text)
        .collect::<Option<_>>()
        .ok_or("options must be strings, numbers or booleans")?;
    let options: [String; OPTION_COUNT] = texts
        .try_into()
        .map_err(|_| "expected four options".to_string())?;

    let correct = raw
        .correct
        .as_ref()
        .and_then(correct_index)
        .ok_or("missing or non-numeric correct index")?;

    QuizQuestion::new(question, options, correct)
        .ok_or_else(|| format!("correct index {} out of range", correct))
}

fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn correct_index(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f < usize::MAX as f64 {
        Some(f as usize)
    } else {
        None
    }
}
