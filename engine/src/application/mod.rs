// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Application services: matching, synthesis and effectiveness
//! aggregation, wired together over the store and event bus seams.

pub mod aggregator;
pub mod matcher;
pub mod synthesis;

use async_trait::async_trait;

use crate::domain::{BehaviorEvent, EngineError};

/// Event bus trait for publishing domain events.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: BehaviorEvent) -> Result<(), EngineError>;
}

/// Drops every event; for callers that do not consume them.
pub struct NullEventBus;

#[async_trait]
impl EventBus for NullEventBus {
    async fn publish(&self, _event: BehaviorEvent) -> Result<(), EngineError> {
        Ok(())
    }
}

pub use aggregator::EffectivenessAggregator;
pub use matcher::{BehaviorMatcher, MatchResult, MatchSource};
pub use synthesis::PatternSynthesizer;
