//! Direct transport: the provider's chat-completions API, addressed and authenticated through
//! the async-openai provider config. One request per call, no retries.

use async_openai::config::{Config as _, OpenAIConfig};
use reqwest::Client;

use crate::core::error::QuizError;

use super::{ChatPayload, ChatTransport, read_completion};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

pub struct DirectTransport {
    client: Client,
    config: OpenAIConfig,
}

impl DirectTransport {
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl ChatTransport for DirectTransport {
    async fn complete(&self, payload: &ChatPayload) -> Result<String, QuizError> {
        let url = self.config.url(CHAT_COMPLETIONS_PATH);
        log::debug!("POST {} (model {})", url, payload.model);
        let resp = self
            .client
            .post(url)
            .headers(self.config.headers())
            .json(payload)
            .send()
            .await?;
        read_completion(resp).await
    }
}
