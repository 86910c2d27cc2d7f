// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! OpenRouter / OpenAI-compatible chat-completions adapter.
//!
//! Anti-corruption layer between [`GenerationService`] and the wire
//! API; works against any endpoint speaking the OpenAI chat schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{GenerationConfig, GenerationError, GenerationService};

pub struct OpenRouterAdapter {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenRouterAdapter {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl GenerationService for OpenRouterAdapter {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status == 401 || status == 403 {
                GenerationError::Authentication(error_text)
            } else if status == 429 {
                GenerationError::RateLimit
            } else {
                GenerationError::Provider(format!("HTTP {status}: {error_text}"))
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Provider(format!("failed to parse response: {e}")))?;

        let choice = chat_response
            .choices
            .first()
            .ok_or_else(|| GenerationError::Provider("no choices in response".into()))?;

        Ok(choice.message.content.clone())
    }
}
