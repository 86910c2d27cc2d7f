// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0
//! PawSense behavior engine.
//!
//! Resolves free-text animal behavior descriptions to canonical
//! behavior patterns, synthesizes new patterns through a generative
//! fallback when nothing matches, and learns solution effectiveness
//! from crowd-reported trial outcomes.
//!
//! # Architecture
//!
//! - **domain** — patterns, solutions, scoring, events, errors
//! - **application** — matcher, synthesis fallback, aggregator
//! - **infrastructure** — pattern stores, generation adapter, seeds

pub mod application;
pub mod domain;
pub mod engine;
pub mod infrastructure;

pub use application::{
    BehaviorMatcher, EffectivenessAggregator, EventBus, MatchResult, MatchSource, NullEventBus,
    PatternSynthesizer,
};
pub use domain::*;
pub use engine::BehaviorEngine;
pub use infrastructure::{InMemoryPatternStore, OpenRouterAdapter, PatternStore};
