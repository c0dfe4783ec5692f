//! Quiz generation: build prompt, call transport, normalize, validate, shuffle.

use std::time::Duration;

use crate::core::config::{self, Config};
use crate::core::error::QuizError;
use crate::core::llm::{ChatPayload, ChatTransport};

use super::normalize::{HeuristicNormalizer, ResponseNormalizer, ensure_braced};
use super::{Difficulty, GenerationRequest, QuizResponse, prompt, shuffle, validate};

/// Model, sampling and limits for one generator.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout: Duration,
    pub min_questions: usize,
}

impl GeneratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model_id.clone(),
            temperature: Some(config::TEMPERATURE),
            top_p: Some(config::TOP_P),
            timeout: config.timeout,
            min_questions: config.min_questions,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: config::DEFAULT_MODEL.to_string(),
            temperature: Some(config::TEMPERATURE),
            top_p: Some(config::TOP_P),
            timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            min_questions: config::DEFAULT_MIN_QUESTIONS,
        }
    }
}

/// Turns a topic and difficulty into a validated, shuffled quiz. One attempt, no retries.
pub struct QuizGenerator<T> {
    transport: T,
    settings: GeneratorSettings,
    normalizer: Box<dyn ResponseNormalizer>,
}

impl<T: ChatTransport> QuizGenerator<T> {
    pub fn new(transport: T, settings: GeneratorSettings) -> Self {
        Self {
            transport,
            settings,
            normalizer: Box::new(HeuristicNormalizer),
        }
    }

    /// Replace the text repair heuristics.
    #[cfg(test)]
    pub fn with_normalizer(mut self, normalizer: impl ResponseNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Validate the inputs and generate.
    pub async fn generate_questions(
        &self,
        topic: &str,
        difficulty: Difficulty,
    ) -> Result<QuizResponse, QuizError> {
        let request = GenerationRequest::new(topic, difficulty)?;
        self.generate(&request).await
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<QuizResponse, QuizError> {
        let payload = self.payload(request);
        log::info!(
            "Generating quiz on {:?} ({}) with {}",
            request.topic(),
            request.difficulty(),
            payload.model
        );

        let raw = tokio::time::timeout(self.settings.timeout, self.transport.complete(&payload))
            .await
            .map_err(|_| {
                log::warn!("Generation timed out after {:?}", self.settings.timeout);
                QuizError::Timeout(self.settings.timeout)
            })??;
        log::debug!("Received {} bytes of model output", raw.len());

        let text = self.normalizer.normalize(&raw);
        ensure_braced(&text)?;
        let questions = validate::validate(&text, self.settings.min_questions)?;
        let questions = shuffle::shuffle_quiz(questions);
        log::info!("Generated {} questions", questions.len());

        Ok(QuizResponse { questions })
    }

    fn payload(&self, request: &GenerationRequest) -> ChatPayload {
        ChatPayload {
            model: self.settings.model.clone(),
            messages: prompt::build_messages(request),
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
        }
    }
}
