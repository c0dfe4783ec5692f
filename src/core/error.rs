//! Quiz generation error kinds. Every stage either succeeds completely or fails with one of these.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// The generation endpoint answered with a non-success HTTP status.
    #[error("API request failed: {status}")]
    Transport { status: u16, body: String },
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// The endpoint answered 2xx but without `choices[0].message.content`.
    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),
    /// Normalized text is not delimited by `{` and `}`.
    #[error("Invalid JSON structure in AI response: {0}")]
    StructuralValidation(String),
    #[error("Invalid JSON response from AI model: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Invalid response structure: missing questions array")]
    MissingQuestionsField,
    #[error("Not enough valid questions received: {found} of {required}")]
    InsufficientQuestions { found: usize, required: usize },
    #[error("Could not reach the generation endpoint: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("{0}")]
    InvalidRequest(String),
}

impl QuizError {
    /// Stable short name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::Transport { .. } => "transport",
            QuizError::Timeout(_) => "timeout",
            QuizError::MalformedUpstreamResponse(_) => "malformed_upstream_response",
            QuizError::StructuralValidation(_) => "structural_validation",
            QuizError::Parse(_) => "parse",
            QuizError::MissingQuestionsField => "missing_questions_field",
            QuizError::InsufficientQuestions { .. } => "insufficient_questions",
            QuizError::Http(_) => "http",
            QuizError::Api(_) => "api",
            QuizError::InvalidRequest(_) => "invalid_request",
        }
    }
}
