//! Proxy transport: POST to a same-origin generation endpoint that holds the credential.

use reqwest::Client;

use crate::core::error::QuizError;

use super::{ChatPayload, ChatTransport, read_completion};

pub struct ProxyTransport {
    client: Client,
    url: String,
}

impl ProxyTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

impl ChatTransport for ProxyTransport {
    async fn complete(&self, payload: &ChatPayload) -> Result<String, QuizError> {
        log::debug!("POST {} (model {})", self.url, payload.model);
        let resp = self.client.post(&self.url).json(payload).send().await?;
        read_completion(resp).await
    }
}
