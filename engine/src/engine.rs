// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Caller-facing facade wiring the matcher, synthesizer and
//! aggregator over shared store and event-bus instances.

use std::sync::Arc;

use crate::application::{
    BehaviorMatcher, EffectivenessAggregator, EventBus, MatchResult, PatternSynthesizer,
};
use crate::domain::{
    BehaviorObservationLog, EngineConfig, EngineError, GenerationService, PatternId, Solution,
    SolutionId, Species,
};
use crate::infrastructure::PatternStore;

pub struct BehaviorEngine {
    matcher: BehaviorMatcher,
    aggregator: EffectivenessAggregator,
}

impl BehaviorEngine {
    pub fn new(
        store: Arc<dyn PatternStore>,
        generator: Arc<dyn GenerationService>,
        event_bus: Arc<dyn EventBus>,
        config: &EngineConfig,
    ) -> Self {
        let synthesizer = Arc::new(PatternSynthesizer::new(
            store.clone(),
            generator,
            event_bus.clone(),
            config.general_categories.clone(),
        ));
        Self {
            matcher: BehaviorMatcher::new(store.clone(), synthesizer, event_bus.clone()),
            aggregator: EffectivenessAggregator::new(store, event_bus, config.max_update_retries),
        }
    }

    /// Resolve a free-text behavior description to a pattern.
    pub async fn match_behavior(
        &self,
        description: &str,
        species: Species,
    ) -> Result<MatchResult, EngineError> {
        self.matcher.match_behavior(description, species).await
    }

    /// Fold one reported trial outcome into a solution's statistics.
    pub async fn record_solution_trial(
        &self,
        pattern_id: &PatternId,
        solution_id: SolutionId,
        effectiveness_percent: f64,
    ) -> Result<Solution, EngineError> {
        self.aggregator
            .record_trial(pattern_id, solution_id, effectiveness_percent)
            .await
    }

    /// Process a completed observation log from the calling layer.
    pub async fn ingest_observation(
        &self,
        log: &BehaviorObservationLog,
    ) -> Result<Vec<Solution>, EngineError> {
        self.aggregator.ingest_observation(log).await
    }
}
