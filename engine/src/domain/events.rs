// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Domain events published on the EventBus for observability and
//! integration with the calling layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pattern::{PatternId, SolutionId};
use super::scoring::MatchType;
use super::species::Species;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorEvent {
    /// A description resolved to an existing pattern.
    PatternMatched {
        pattern_id: PatternId,
        species: Species,
        match_type: MatchType,
        confidence: u32,
        timestamp: DateTime<Utc>,
    },

    /// The synthesis fallback persisted a new pattern.
    PatternSynthesized {
        pattern_id: PatternId,
        species: Species,
        name: String,
        /// True when the pattern came from the safe-default path
        /// rather than a parsed generation payload.
        fallback: bool,
        timestamp: DateTime<Utc>,
    },

    /// A trial outcome was folded into a solution's running mean.
    SolutionTrialRecorded {
        pattern_id: PatternId,
        solution_id: SolutionId,
        effectiveness_percent: f64,
        trial_count: u64,
        effectiveness: f64,
        timestamp: DateTime<Utc>,
    },

    /// A helpful custom solution was promoted into a pattern.
    SolutionPromoted {
        pattern_id: PatternId,
        solution_id: SolutionId,
        timestamp: DateTime<Utc>,
    },
}

impl BehaviorEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            BehaviorEvent::PatternMatched { timestamp, .. } => *timestamp,
            BehaviorEvent::PatternSynthesized { timestamp, .. } => *timestamp,
            BehaviorEvent::SolutionTrialRecorded { timestamp, .. } => *timestamp,
            BehaviorEvent::SolutionPromoted { timestamp, .. } => *timestamp,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            BehaviorEvent::PatternMatched { .. } => "pattern_matched",
            BehaviorEvent::PatternSynthesized { .. } => "pattern_synthesized",
            BehaviorEvent::SolutionTrialRecorded { .. } => "solution_trial_recorded",
            BehaviorEvent::SolutionPromoted { .. } => "solution_promoted",
        }
    }
}
