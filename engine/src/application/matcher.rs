// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Matcher: scores every stored pattern of a species against a
//! description and returns the best candidate, or hands off to the
//! synthesis fallback when nothing matches.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::synthesis::PatternSynthesizer;
use crate::application::EventBus;
use crate::domain::{
    scoring, BehaviorEvent, BehaviorPattern, EngineError, MatchType, Species,
};
use crate::infrastructure::PatternStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchSource {
    #[serde(rename = "database")]
    Database,
    #[serde(rename = "ai-generated")]
    AiGenerated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub pattern: BehaviorPattern,
    pub source: MatchSource,
    pub match_type: MatchType,
    pub confidence: u32,
}

pub struct BehaviorMatcher {
    store: Arc<dyn PatternStore>,
    synthesizer: Arc<PatternSynthesizer>,
    event_bus: Arc<dyn EventBus>,
}

impl BehaviorMatcher {
    pub fn new(
        store: Arc<dyn PatternStore>,
        synthesizer: Arc<PatternSynthesizer>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            store,
            synthesizer,
            event_bus,
        }
    }

    /// Resolve a free-text description to a pattern. Never fails for
    /// a well-formed input: a miss synthesizes (at worst the
    /// safe-default consult-a-professional pattern).
    pub async fn match_behavior(
        &self,
        description: &str,
        species: Species,
    ) -> Result<MatchResult, EngineError> {
        if description.trim().is_empty() {
            return Err(EngineError::Validation(
                "description must not be empty".to_string(),
            ));
        }

        let patterns = self.store.find_by_species(species).await?;
        debug!(species = %species, candidates = patterns.len(), "scoring candidate patterns");

        let mut scored: Vec<(BehaviorPattern, scoring::PatternScore)> = patterns
            .into_iter()
            .map(|p| {
                let s = scoring::score(description, &p);
                (p, s)
            })
            .filter(|(_, s)| s.is_match())
            .collect();
        // Stable sort: ties keep first-seen order. Exact-name matches
        // dominate, so collisions are rare anyway.
        scored.sort_by(|a, b| b.1.score.cmp(&a.1.score));

        if let Some((pattern, best)) = scored.into_iter().next() {
            debug!(
                pattern = %pattern.id,
                score = best.score,
                match_type = ?best.match_type,
                "database match"
            );
            if let Err(e) = self
                .event_bus
                .publish(BehaviorEvent::PatternMatched {
                    pattern_id: pattern.id.clone(),
                    species,
                    match_type: best.match_type,
                    confidence: best.score,
                    timestamp: Utc::now(),
                })
                .await
            {
                warn!(error = %e, "failed to publish match event");
            }
            return Ok(MatchResult {
                pattern,
                source: MatchSource::Database,
                match_type: best.match_type,
                confidence: best.score,
            });
        }

        let pattern = self.synthesizer.synthesize(description, species).await?;
        Ok(MatchResult {
            pattern,
            source: MatchSource::AiGenerated,
            match_type: MatchType::New,
            confidence: 0,
        })
    }
}
