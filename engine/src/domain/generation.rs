// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Generative completion service interface and the duck-typed shapes
//! its responses are parsed into.
//!
//! The service is an anti-corruption seam: the synthesizer only ever
//! sees a [`GenerationOutcome`], validated exhaustively before the
//! store is touched. Malformed or non-JSON responses collapse into
//! `Unparsable`, which the synthesizer resolves with the safe-default
//! pattern rather than failing the match.

use async_trait::async_trait;
use serde::Deserialize;

/// Errors raised by a generation backend. Never propagated past the
/// synthesizer; every variant degrades to the safe-default path.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limit exceeded")]
    RateLimit,

    #[error("provider error: {0}")]
    Provider(String),
}

/// Domain interface for the generative completion backend.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Run one completion and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Loosely-typed solution as the generation service emits it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolutionPayload {
    pub solution: Option<String>,
    pub effectiveness: Option<f64>,
    pub implementation: Option<String>,
    pub steps: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicalFlagsPayload {
    pub needs_vet: Option<bool>,
    pub urgency: Option<String>,
    pub red_flags: Option<Vec<String>>,
    pub related_conditions: Option<Vec<String>>,
}

/// Full pattern payload; every field optional, defaulted during
/// coercion rather than trusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPatternPayload {
    pub species: Option<Vec<String>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub causes: Option<Vec<String>>,
    pub solutions: Option<Vec<SolutionPayload>>,
    pub medical_flags: Option<MedicalFlagsPayload>,
    pub prevention_tips: Option<Vec<String>>,
}

/// Tagged view of a generation response.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// `{"use_existing": "name"}` — reuse a known general category.
    UseExisting(String),
    /// A full pattern payload to validate and persist.
    NewPattern(Box<NewPatternPayload>),
    /// Anything the engine cannot make sense of.
    Unparsable,
}

impl GenerationOutcome {
    pub fn parse(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => return GenerationOutcome::Unparsable,
        };

        if let Some(name) = value.get("use_existing").and_then(|v| v.as_str()) {
            return GenerationOutcome::UseExisting(name.to_string());
        }

        match serde_json::from_value::<NewPatternPayload>(value) {
            Ok(payload) => GenerationOutcome::NewPattern(Box::new(payload)),
            Err(_) => GenerationOutcome::Unparsable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reuse_directive() {
        let outcome = GenerationOutcome::parse(r#"{"use_existing": "hiding"}"#);
        assert!(matches!(outcome, GenerationOutcome::UseExisting(name) if name == "hiding"));
    }

    #[test]
    fn test_parse_new_pattern_payload() {
        let raw = r#"{
            "species": ["cat"],
            "name": "night_zoomies",
            "description": "Sudden bursts of running at night",
            "keywords": ["running", "night"],
            "solutions": [{"solution": "Evening play session", "effectiveness": 0.7,
                           "implementation": "easy", "steps": ["Play before bed"]}]
        }"#;
        match GenerationOutcome::parse(raw) {
            GenerationOutcome::NewPattern(payload) => {
                assert_eq!(payload.name.as_deref(), Some("night_zoomies"));
                assert_eq!(payload.solutions.as_ref().unwrap().len(), 1);
            }
            other => panic!("expected NewPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_non_json_is_unparsable() {
        assert!(matches!(
            GenerationOutcome::parse("Sorry, I can't help with that."),
            GenerationOutcome::Unparsable
        ));
    }

    #[test]
    fn test_parse_wrong_types_is_unparsable() {
        assert!(matches!(
            GenerationOutcome::parse(r#"{"name": 42, "species": "not-a-list"}"#),
            GenerationOutcome::Unparsable
        ));
    }

    #[test]
    fn test_parse_empty_object_is_empty_payload() {
        // An empty object is still a valid (fully-defaulted) payload.
        match GenerationOutcome::parse("{}") {
            GenerationOutcome::NewPattern(payload) => assert!(payload.name.is_none()),
            other => panic!("expected NewPattern, got {other:?}"),
        }
    }
}
