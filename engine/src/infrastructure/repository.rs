// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Pattern store contract.
//!
//! `load_solution`/`store_solution` form the optimistic concurrency
//! primitive for effectiveness updates: a store hands out the
//! solution together with a version token, and rejects a write whose
//! token is stale with [`EngineError::Conflict`]. Versions live in the
//! store, not on the domain type.

use async_trait::async_trait;

use crate::domain::{BehaviorPattern, EngineError, PatternId, Solution, SolutionId, Species};

/// A solution snapshot plus the version token required to write it back.
#[derive(Debug, Clone)]
pub struct VersionedSolution {
    pub solution: Solution,
    pub version: u64,
}

#[async_trait]
pub trait PatternStore: Send + Sync {
    /// All patterns tagged with the given species. Order is not part
    /// of the contract; the matcher must not use it for tie-breaks.
    async fn find_by_species(&self, species: Species) -> Result<Vec<BehaviorPattern>, EngineError>;

    /// Exact canonical lookup used before synthesis creates a duplicate.
    async fn find_by_name_and_species(
        &self,
        name: &str,
        species: Species,
    ) -> Result<Option<BehaviorPattern>, EngineError>;

    async fn find_by_id(&self, id: &PatternId) -> Result<Option<BehaviorPattern>, EngineError>;

    /// Insert a new pattern. `Validation` on missing required fields;
    /// `Conflict` when `(name, species)` already exists.
    async fn insert(&self, pattern: BehaviorPattern) -> Result<BehaviorPattern, EngineError>;

    /// Append a solution to an existing pattern.
    async fn append_solution(
        &self,
        pattern_id: &PatternId,
        solution: Solution,
    ) -> Result<Solution, EngineError>;

    /// Read one solution together with its current version.
    async fn load_solution(
        &self,
        pattern_id: &PatternId,
        solution_id: SolutionId,
    ) -> Result<VersionedSolution, EngineError>;

    /// Write back a solution read at `expected_version`. `Conflict`
    /// when a concurrent writer got there first.
    async fn store_solution(
        &self,
        pattern_id: &PatternId,
        expected_version: u64,
        solution: Solution,
    ) -> Result<Solution, EngineError>;
}
