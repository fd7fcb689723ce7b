//! Chat assistant collaborator
//!
//! Tenant sites forward visitor questions to an external chat backend. The
//! backend takes `{userText, systemInstruction}` and answers `{text}`. Any
//! failure turns into [`FALLBACK_REPLY`]; there are no retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{HttpClientConfig, create_client};
use crate::{EgressError, Result};

/// Reply shown when the backend cannot be reached or answers nonsense.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't reach the server.";

/// Chat backend settings. Chat is disabled when no endpoint is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub endpoint: Option<String>,
    /// Sent as a bearer token when set
    pub api_key: Option<String>,
    /// Request timeout in seconds; the client default when absent
    pub timeout_secs: Option<u64>,
}

impl ChatConfig {
    pub fn is_enabled(&self) -> bool {
        self.endpoint
            .as_deref()
            .is_some_and(|endpoint| !endpoint.trim().is_empty())
    }
}

#[async_trait]
pub trait ChatAssistant: Send + Sync {
    /// Answer `user_text` under `system_instruction`. Never fails; problems
    /// yield [`FALLBACK_REPLY`].
    async fn reply(&self, user_text: &str, system_instruction: &str) -> String;
}

/// System instruction for a tenant's assistant.
pub fn system_instruction_for(name: &str, description: &str) -> String {
    let mut instruction = format!("You are the volunteer assistant for {}.", name);
    let description = description.trim();
    if !description.is_empty() {
        instruction.push(' ');
        instruction.push_str(description);
    }
    instruction.push_str(
        " Answer questions about the organization, its events and how to get involved. \
         Keep answers short and friendly.",
    );
    instruction
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    user_text: &'a str,
    system_instruction: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    text: String,
}

/// Chat backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChatAssistant {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpChatAssistant {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Assistant for `config`, or `None` when chat is disabled.
    pub fn from_config(config: &ChatConfig) -> Result<Option<Self>> {
        let Some(endpoint) = config.endpoint.as_deref().filter(|_| config.is_enabled()) else {
            return Ok(None);
        };

        let mut client_config = HttpClientConfig::default();
        if let Some(timeout_secs) = config.timeout_secs {
            client_config.timeout_secs = timeout_secs;
        }
        let client = create_client(&client_config)?;

        Ok(Some(Self::new(
            endpoint.trim(),
            config.api_key.clone().filter(|key| !key.is_empty()),
            client,
        )))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One request/response exchange with the backend.
    pub async fn send(&self, user_text: &str, system_instruction: &str) -> Result<String> {
        let mut request = self.client.post(&self.endpoint).json(&ChatRequest {
            user_text,
            system_instruction,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EgressError::ProviderError {
                status_code: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|e| EgressError::InvalidResponse(format!("Failed to decode reply: {}", e)))?;

        if parsed.text.trim().is_empty() {
            return Err(EgressError::InvalidResponse("Empty reply".to_string()));
        }
        Ok(parsed.text)
    }
}

#[async_trait]
impl ChatAssistant for HttpChatAssistant {
    async fn reply(&self, user_text: &str, system_instruction: &str) -> String {
        match self.send(user_text, system_instruction).await {
            Ok(text) => {
                debug!("Chat backend replied with {} bytes", text.len());
                text
            }
            Err(e) => {
                warn!("Chat backend request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
