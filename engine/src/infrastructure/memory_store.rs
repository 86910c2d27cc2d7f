// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! In-memory pattern store.
//!
//! Backs tests and single-process deployments; a document store
//! implementation satisfies the same trait. Solution versions are
//! tracked per `(pattern, solution)` pair under the same lock as the
//! patterns so a load/store cycle observes a consistent snapshot.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{BehaviorPattern, EngineError, PatternId, Solution, SolutionId, Species};
use crate::infrastructure::repository::{PatternStore, VersionedSolution};

#[derive(Default)]
struct Inner {
    patterns: HashMap<PatternId, BehaviorPattern>,
    versions: HashMap<(PatternId, SolutionId), u64>,
}

pub struct InMemoryPatternStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Build a store pre-populated with the given patterns, skipping
    /// validation races; intended for seeding and tests.
    pub async fn with_patterns(
        patterns: impl IntoIterator<Item = BehaviorPattern>,
    ) -> Result<Self, EngineError> {
        let store = Self::new();
        for pattern in patterns {
            store.insert(pattern).await?;
        }
        Ok(store)
    }
}

impl Default for InMemoryPatternStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PatternStore for InMemoryPatternStore {
    async fn find_by_species(&self, species: Species) -> Result<Vec<BehaviorPattern>, EngineError> {
        let inner = self.inner.read().await;
        Ok(inner
            .patterns
            .values()
            .filter(|p| p.applies_to(species))
            .cloned()
            .collect())
    }

    async fn find_by_name_and_species(
        &self,
        name: &str,
        species: Species,
    ) -> Result<Option<BehaviorPattern>, EngineError> {
        let inner = self.inner.read().await;
        Ok(inner
            .patterns
            .values()
            .find(|p| p.name == name && p.applies_to(species))
            .cloned())
    }

    async fn find_by_id(&self, id: &PatternId) -> Result<Option<BehaviorPattern>, EngineError> {
        let inner = self.inner.read().await;
        Ok(inner.patterns.get(id).cloned())
    }

    async fn insert(&self, pattern: BehaviorPattern) -> Result<BehaviorPattern, EngineError> {
        pattern.validate()?;

        let mut inner = self.inner.write().await;
        let clash = inner.patterns.values().any(|existing| {
            existing.name == pattern.name
                && existing.species.iter().any(|s| pattern.applies_to(*s))
        });
        if clash {
            return Err(EngineError::Conflict(format!(
                "pattern '{}' already exists for one of its species",
                pattern.name
            )));
        }

        for solution in &pattern.solutions {
            inner
                .versions
                .insert((pattern.id.clone(), solution.id), 0);
        }
        inner.patterns.insert(pattern.id.clone(), pattern.clone());
        Ok(pattern)
    }

    async fn append_solution(
        &self,
        pattern_id: &PatternId,
        solution: Solution,
    ) -> Result<Solution, EngineError> {
        let mut inner = self.inner.write().await;
        let pattern = inner
            .patterns
            .get_mut(pattern_id)
            .ok_or_else(|| EngineError::NotFound(format!("pattern {pattern_id}")))?;

        pattern.solutions.push(solution.clone());
        pattern.last_updated = Utc::now();
        inner
            .versions
            .insert((pattern_id.clone(), solution.id), 0);
        Ok(solution)
    }

    async fn load_solution(
        &self,
        pattern_id: &PatternId,
        solution_id: SolutionId,
    ) -> Result<VersionedSolution, EngineError> {
        let inner = self.inner.read().await;
        let pattern = inner
            .patterns
            .get(pattern_id)
            .ok_or_else(|| EngineError::NotFound(format!("pattern {pattern_id}")))?;
        let solution = pattern
            .solution(solution_id)
            .ok_or_else(|| EngineError::NotFound(format!("solution {solution_id}")))?;
        let version = inner
            .versions
            .get(&(pattern_id.clone(), solution_id))
            .copied()
            .unwrap_or(0);
        Ok(VersionedSolution {
            solution: solution.clone(),
            version,
        })
    }

    async fn store_solution(
        &self,
        pattern_id: &PatternId,
        expected_version: u64,
        solution: Solution,
    ) -> Result<Solution, EngineError> {
        let mut inner = self.inner.write().await;

        let current = inner
            .versions
            .get(&(pattern_id.clone(), solution.id))
            .copied()
            .unwrap_or(0);
        if current != expected_version {
            return Err(EngineError::Conflict(format!(
                "solution {} was updated concurrently (version {} != {})",
                solution.id, current, expected_version
            )));
        }

        let pattern = inner
            .patterns
            .get_mut(pattern_id)
            .ok_or_else(|| EngineError::NotFound(format!("pattern {pattern_id}")))?;
        let slot = pattern
            .solutions
            .iter_mut()
            .find(|s| s.id == solution.id)
            .ok_or_else(|| EngineError::NotFound(format!("solution {}", solution.id)))?;
        *slot = solution.clone();
        pattern.last_updated = Utc::now();

        inner
            .versions
            .insert((pattern_id.clone(), solution.id), current + 1);
        Ok(solution)
    }
}
