//! Quiz data model and the generation pipeline: prompt, normalize, validate, shuffle.

mod normalize;
mod pipeline;
mod prompt;
mod shuffle;
mod validate;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::QuizError;

pub use pipeline::{GeneratorSettings, QuizGenerator};

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// One question: prompt text, four options, index of the correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub correct: usize,
}

impl QuizQuestion {
    /// Returns `None` when the question is blank or `correct` is out of range.
    pub fn new(
        question: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct: usize,
    ) -> Option<Self> {
        let question = question.into();
        if question.trim().is_empty() || correct >= OPTION_COUNT {
            return None;
        }
        Some(Self {
            question,
            options,
            correct,
        })
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }
}

/// A validated, shuffled quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
}

impl QuizResponse {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty {0:?} (expected beginner, intermediate or advanced)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDifficultyError(trimmed.to_string()))
    }
}

/// Topic and difficulty for one generation. The topic is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topic: String,
    difficulty: Difficulty,
}

impl GenerationRequest {
    pub fn new(topic: &str, difficulty: Difficulty) -> Result<Self, QuizError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(QuizError::InvalidRequest("Please enter a topic".to_string()));
        }
        Ok(Self {
            topic: topic.to_string(),
            difficulty,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}
