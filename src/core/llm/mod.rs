//! Transport to a chat-completion endpoint: request payload, response content extraction,
//! and the direct and proxy implementations.

mod direct;
mod proxy;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::config::Config;
use crate::core::error::QuizError;

pub use direct::DirectTransport;
pub use proxy::ProxyTransport;

/// One role/content message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

/// Sends a chat payload and returns the text of the first choice.
pub trait ChatTransport: Send + Sync {
    fn complete(
        &self,
        payload: &ChatPayload,
    ) -> impl Future<Output = Result<String, QuizError>> + Send;
}

/// Pull `choices[0].message.content` out of a completion body.
pub fn extract_content(body: &Value) -> Result<String, QuizError> {
    if let Some(err) = body.get("error") {
        let msg = err
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| err.as_str())
            .unwrap_or("Unknown error");
        return Err(QuizError::Api(msg.to_string()));
    }
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| {
            QuizError::MalformedUpstreamResponse(
                "missing choices[0].message.content".to_string(),
            )
        })
}

/// Read a chat-completion HTTP response: non-2xx is a transport error, otherwise the first choice.
async fn read_completion(resp: reqwest::Response) -> Result<String, QuizError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        log::warn!("Generation endpoint returned {}: {}", status, body);
        return Err(QuizError::Transport {
            status: status.as_u16(),
            body,
        });
    }

    let body: Value = resp.json().await.map_err(|e| {
        QuizError::MalformedUpstreamResponse(format!("response body is not JSON: {}", e))
    })?;
    extract_content(&body)
}

/// Transport chosen from configuration: the proxy when a proxy URL is set, otherwise direct.
pub enum AnyTransport {
    Direct(DirectTransport),
    Proxy(ProxyTransport),
}

impl AnyTransport {
    pub fn from_config(config: &Config) -> Result<Self, crate::core::config::ConfigError> {
        match &config.proxy_url {
            Some(url) => Ok(AnyTransport::Proxy(ProxyTransport::new(url.clone()))),
            None => Ok(AnyTransport::Direct(DirectTransport::new(
                config.openai_config()?,
            ))),
        }
    }
}

impl ChatTransport for AnyTransport {
    async fn complete(&self, payload: &ChatPayload) -> Result<String, QuizError> {
        match self {
            AnyTransport::Direct(t) => t.complete(payload).await,
            AnyTransport::Proxy(t) => t.complete(payload).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_omits_unset_sampling() {
        let payload = ChatPayload {
            model: "m".to_string(),
            messages: vec![ChatMessage::user("hi")],
            temperature: None,
            top_p: None,
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            v,
            json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]})
        );
    }

    #[test]
    fn payload_includes_sampling_when_set() {
        let payload = ChatPayload {
            model: "m".to_string(),
            messages: vec![],
            temperature: Some(0.5),
            top_p: Some(0.5),
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["temperature"], 0.5);
        assert_eq!(v["top_p"], 0.5);
    }

    #[test]
    fn extract_content_first_choice() {
        let body = json!({"choices": [
            {"message": {"role": "assistant", "content": "first"}},
            {"message": {"role": "assistant", "content": "second"}}
        ]});
        assert_eq!(extract_content(&body).unwrap(), "first");
    }

    #[test]
    fn extract_content_missing_fields() {
        for body in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{"message": {}}]}),
            json!({"choices": [{"message": {"content": null}}]}),
        ] {
            assert!(matches!(
                extract_content(&body),
                Err(QuizError::MalformedUpstreamResponse(_))
            ));
        }
    }

    #[test]
    fn extract_content_error_body() {
        let body = json!({"error": {"message": "Rate limit exceeded"}});
        match extract_content(&body) {
            Err(QuizError::Api(msg)) => assert_eq!(msg, "Rate limit exceeded"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
