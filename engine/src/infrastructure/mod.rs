// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer: pattern store implementations, the
//! generation-service adapter and the seed catalog.

pub mod memory_store;
pub mod openrouter;
pub mod repository;
pub mod seed;

pub use memory_store::InMemoryPatternStore;
pub use openrouter::OpenRouterAdapter;
pub use repository::{PatternStore, VersionedSolution};
