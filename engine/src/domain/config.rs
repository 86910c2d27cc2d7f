// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Engine configuration. Deserializable from the host application's
//! config file; every field has a working default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Bounded retry count for optimistic effectiveness updates.
    #[serde(default = "default_max_update_retries")]
    pub max_update_retries: u32,

    /// General category slugs the synthesis prompt steers the model
    /// toward reusing instead of minting overly specific patterns.
    #[serde(default = "default_general_categories")]
    pub general_categories: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            max_update_retries: default_max_update_retries(),
            general_categories: default_general_categories(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// OpenAI-compatible chat-completions endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
        }
    }
}

fn default_max_update_retries() -> u32 {
    3
}

fn default_general_categories() -> Vec<String> {
    [
        "null_behavior",
        "hiding_behavior",
        "scratching_behavior",
        "excessive_vocalization",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}
