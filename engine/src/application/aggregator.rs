// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Effectiveness aggregator: folds reported trial outcomes into a
//! solution's running-mean effectiveness.
//!
//! Trials arrive on the 0–100 percentage scale; stored effectiveness
//! is the unit-interval mean, converted here and nowhere else:
//! `effectiveness = total_effectiveness / trial_count / 100`.
//!
//! Updates are read-modify-write with optimistic retries so
//! concurrent trials on the same solution never lose increments.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::EventBus;
use crate::domain::{
    round2, BehaviorEvent, BehaviorObservationLog, EngineError, PatternId, Solution, SolutionId,
    SolutionSource,
};
use crate::infrastructure::PatternStore;

pub struct EffectivenessAggregator {
    store: Arc<dyn PatternStore>,
    event_bus: Arc<dyn EventBus>,
    max_retries: u32,
}

impl EffectivenessAggregator {
    pub fn new(store: Arc<dyn PatternStore>, event_bus: Arc<dyn EventBus>, max_retries: u32) -> Self {
        Self {
            store,
            event_bus,
            max_retries: max_retries.max(1),
        }
    }

    /// Fold one trial outcome into a solution's running mean.
    ///
    /// Only user-submitted solutions carry crowd statistics; a trial
    /// against an expert solution lives in the caller's observation
    /// log and the stored solution is returned unchanged.
    pub async fn record_trial(
        &self,
        pattern_id: &PatternId,
        solution_id: SolutionId,
        effectiveness_percent: f64,
    ) -> Result<Solution, EngineError> {
        if !(0.0..=100.0).contains(&effectiveness_percent) {
            return Err(EngineError::Validation(format!(
                "effectiveness must be between 0 and 100, got {effectiveness_percent}"
            )));
        }

        for attempt in 0..self.max_retries {
            let loaded = self.store.load_solution(pattern_id, solution_id).await?;
            let mut solution = loaded.solution;

            if solution.source == SolutionSource::Expert {
                return Ok(solution);
            }

            solution.trial_count += 1;
            solution.total_effectiveness += effectiveness_percent;
            solution.effectiveness =
                round2(solution.total_effectiveness / solution.trial_count as f64 / 100.0);
            solution.last_tried = Some(Utc::now());

            match self
                .store
                .store_solution(pattern_id, loaded.version, solution)
                .await
            {
                Ok(updated) => {
                    if let Err(e) = self
                        .event_bus
                        .publish(BehaviorEvent::SolutionTrialRecorded {
                            pattern_id: pattern_id.clone(),
                            solution_id,
                            effectiveness_percent,
                            trial_count: updated.trial_count,
                            effectiveness: updated.effectiveness,
                            timestamp: Utc::now(),
                        })
                        .await
                    {
                        warn!(error = %e, "failed to publish trial event");
                    }
                    return Ok(updated);
                }
                Err(EngineError::Conflict(_)) => {
                    debug!(solution = %solution_id, attempt, "trial update lost a race, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(EngineError::Conflict(format!(
            "trial update for solution {solution_id} exhausted {} retries",
            self.max_retries
        )))
    }

    /// Promote a helpful custom solution into a pattern. The first
    /// report counts as the solution's initial trial.
    pub async fn promote_solution(
        &self,
        pattern_id: &PatternId,
        text: impl Into<String>,
        steps: Vec<String>,
        effectiveness_percent: f64,
        submitted_by: Option<String>,
    ) -> Result<Solution, EngineError> {
        if !(0.0..=100.0).contains(&effectiveness_percent) {
            return Err(EngineError::Validation(format!(
                "effectiveness must be between 0 and 100, got {effectiveness_percent}"
            )));
        }

        let solution =
            Solution::user_submitted(text, steps, effectiveness_percent, submitted_by);
        let stored = self.store.append_solution(pattern_id, solution).await?;

        if let Err(e) = self
            .event_bus
            .publish(BehaviorEvent::SolutionPromoted {
                pattern_id: pattern_id.clone(),
                solution_id: stored.id,
                timestamp: Utc::now(),
            })
            .await
        {
            warn!(error = %e, "failed to publish promotion event");
        }
        Ok(stored)
    }

    /// Walk a reported observation log: record trials for referenced
    /// user-submitted solutions and promote helpful custom ones.
    /// Entries without an effectiveness report are skipped.
    pub async fn ingest_observation(
        &self,
        log: &BehaviorObservationLog,
    ) -> Result<Vec<Solution>, EngineError> {
        log.validate()?;

        let Some(pattern_id) = &log.pattern_id else {
            // Custom behavior with no canonical pattern: nothing to update.
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for tried in &log.tried {
            let Some(percent) = tried.effectiveness_percent else {
                continue;
            };
            match tried.solution_id {
                Some(solution_id) if tried.source == SolutionSource::UserSubmitted => {
                    updated.push(self.record_trial(pattern_id, solution_id, percent).await?);
                }
                None if tried.helped_resolve => {
                    updated.push(
                        self.promote_solution(
                            pattern_id,
                            tried.text.clone(),
                            tried.steps_followed.clone(),
                            percent,
                            log.reported_by.clone(),
                        )
                        .await?,
                    );
                }
                _ => {}
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::NullEventBus;
    use crate::domain::{
        BehaviorPattern, Difficulty, LogStatus, ObservedFrequency, Species, TriedSolution,
    };
    use crate::infrastructure::repository::{PatternStore, VersionedSolution};
    use crate::infrastructure::InMemoryPatternStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    async fn store_with_user_solution() -> (Arc<InMemoryPatternStore>, PatternId, SolutionId) {
        let store = Arc::new(InMemoryPatternStore::new());
        let pattern = store
            .insert(BehaviorPattern::new(
                vec![Species::Cat],
                "hiding",
                "Cat withdraws to enclosed spots",
            ))
            .await
            .unwrap();
        let mut solution = Solution::user_submitted("Warm blanket cave", vec![], 50.0, None);
        // Fresh zero-state solution for running-mean tests.
        solution.trial_count = 0;
        solution.total_effectiveness = 0.0;
        solution.effectiveness = 0.0;
        let solution = store.append_solution(&pattern.id, solution).await.unwrap();
        (store, pattern.id, solution.id)
    }

    fn aggregator(store: Arc<dyn PatternStore>) -> EffectivenessAggregator {
        EffectivenessAggregator::new(store, Arc::new(NullEventBus), 3)
    }

    #[tokio::test]
    async fn test_running_mean_80_then_40_is_060() {
        let (store, pattern_id, solution_id) = store_with_user_solution().await;
        let agg = aggregator(store);

        agg.record_trial(&pattern_id, solution_id, 80.0).await.unwrap();
        let updated = agg.record_trial(&pattern_id, solution_id, 40.0).await.unwrap();

        assert_eq!(updated.trial_count, 2);
        assert_eq!(updated.total_effectiveness, 120.0);
        assert!((updated.effectiveness - 0.60).abs() < 0.01);
        assert!(updated.last_tried.is_some());
    }

    #[tokio::test]
    async fn test_running_mean_over_many_trials() {
        let (store, pattern_id, solution_id) = store_with_user_solution().await;
        let agg = aggregator(store);

        let percents = [100.0, 0.0, 50.0, 75.0, 25.0, 60.0];
        let mut updated = None;
        for p in percents {
            updated = Some(agg.record_trial(&pattern_id, solution_id, p).await.unwrap());
        }

        let updated = updated.unwrap();
        let expected = percents.iter().sum::<f64>() / percents.len() as f64 / 100.0;
        assert_eq!(updated.trial_count, percents.len() as u64);
        assert!((updated.effectiveness - expected).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_expert_solution_left_unchanged() {
        let store = Arc::new(InMemoryPatternStore::new());
        let pattern = store
            .insert(
                BehaviorPattern::new(vec![Species::Dog], "digging", "Digs up the yard")
                    .with_solutions(vec![Solution::expert(
                        "Designated digging zone",
                        0.8,
                        Difficulty::Medium,
                        vec![],
                    )]),
            )
            .await
            .unwrap();
        let solution_id = pattern.solutions[0].id;
        let agg = aggregator(store.clone());

        let result = agg.record_trial(&pattern.id, solution_id, 90.0).await.unwrap();
        assert_eq!(result.trial_count, 0);
        assert_eq!(result.effectiveness, 0.8);
    }

    #[tokio::test]
    async fn test_out_of_range_percent_rejected() {
        let (store, pattern_id, solution_id) = store_with_user_solution().await;
        let agg = aggregator(store);

        for bad in [-1.0, 100.5, f64::NAN] {
            let err = agg.record_trial(&pattern_id, solution_id, bad).await.unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)), "{bad} accepted");
        }
    }

    #[tokio::test]
    async fn test_unknown_solution_not_found() {
        let (store, pattern_id, _) = store_with_user_solution().await;
        let agg = aggregator(store);

        let err = agg
            .record_trial(&pattern_id, SolutionId::new(), 50.0)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_promote_solution_initial_stats() {
        let (store, pattern_id, _) = store_with_user_solution().await;
        let agg = aggregator(store.clone());

        let promoted = agg
            .promote_solution(&pattern_id, "Night light", vec![], 70.0, Some("u9".into()))
            .await
            .unwrap();

        assert_eq!(promoted.trial_count, 1);
        assert_eq!(promoted.total_effectiveness, 70.0);
        assert_eq!(promoted.effectiveness, 0.7);
        assert_eq!(promoted.source, SolutionSource::UserSubmitted);

        let pattern = store.find_by_id(&pattern_id).await.unwrap().unwrap();
        assert!(pattern.solution(promoted.id).is_some());
    }

    #[tokio::test]
    async fn test_ingest_observation_records_and_promotes() {
        let (store, pattern_id, solution_id) = store_with_user_solution().await;
        let agg = aggregator(store.clone());

        let log = BehaviorObservationLog {
            pattern_id: Some(pattern_id.clone()),
            custom_behavior: None,
            reported_by: Some("u1".to_string()),
            frequency: ObservedFrequency::Daily,
            intensity: 2,
            tried: vec![
                TriedSolution {
                    solution_id: Some(solution_id),
                    text: "Warm blanket cave".to_string(),
                    helped_resolve: true,
                    effectiveness_percent: Some(80.0),
                    steps_followed: vec![],
                    source: SolutionSource::UserSubmitted,
                },
                TriedSolution {
                    solution_id: None,
                    text: "Left a radio playing".to_string(),
                    helped_resolve: true,
                    effectiveness_percent: Some(60.0),
                    steps_followed: vec!["Tune to calm station".to_string()],
                    source: SolutionSource::UserSubmitted,
                },
                // Expert suggestion with a reference: log-only.
                TriedSolution {
                    solution_id: Some(solution_id),
                    text: "Provide a safe retreat".to_string(),
                    helped_resolve: false,
                    effectiveness_percent: Some(20.0),
                    steps_followed: vec![],
                    source: SolutionSource::Expert,
                },
            ],
            status: LogStatus::Resolved,
        };

        let updated = agg.ingest_observation(&log).await.unwrap();
        assert_eq!(updated.len(), 2);

        let pattern = store.find_by_id(&pattern_id).await.unwrap().unwrap();
        // Referenced solution got exactly one trial from the log.
        let referenced = pattern.solution(solution_id).unwrap();
        assert_eq!(referenced.trial_count, 1);
        assert_eq!(referenced.effectiveness, 0.8);
        // Custom solution was promoted.
        assert_eq!(pattern.solutions.len(), 2);
    }

    /// Store that lands a competing 80% trial between the caller's
    /// read and first write, conflicting once before accepting the
    /// retried write.
    struct ConflictOnce {
        inner: Arc<InMemoryPatternStore>,
        raced: AtomicBool,
    }

    #[async_trait]
    impl PatternStore for ConflictOnce {
        async fn find_by_species(
            &self,
            species: Species,
        ) -> Result<Vec<BehaviorPattern>, EngineError> {
            self.inner.find_by_species(species).await
        }

        async fn find_by_name_and_species(
            &self,
            name: &str,
            species: Species,
        ) -> Result<Option<BehaviorPattern>, EngineError> {
            self.inner.find_by_name_and_species(name, species).await
        }

        async fn find_by_id(
            &self,
            id: &PatternId,
        ) -> Result<Option<BehaviorPattern>, EngineError> {
            self.inner.find_by_id(id).await
        }

        async fn insert(
            &self,
            pattern: BehaviorPattern,
        ) -> Result<BehaviorPattern, EngineError> {
            self.inner.insert(pattern).await
        }

        async fn append_solution(
            &self,
            pattern_id: &PatternId,
            solution: Solution,
        ) -> Result<Solution, EngineError> {
            self.inner.append_solution(pattern_id, solution).await
        }

        async fn load_solution(
            &self,
            pattern_id: &PatternId,
            solution_id: SolutionId,
        ) -> Result<VersionedSolution, EngineError> {
            self.inner.load_solution(pattern_id, solution_id).await
        }

        async fn store_solution(
            &self,
            pattern_id: &PatternId,
            expected_version: u64,
            solution: Solution,
        ) -> Result<Solution, EngineError> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                let loaded = self.inner.load_solution(pattern_id, solution.id).await?;
                let mut sibling = loaded.solution;
                sibling.trial_count += 1;
                sibling.total_effectiveness += 80.0;
                sibling.effectiveness =
                    round2(sibling.total_effectiveness / sibling.trial_count as f64 / 100.0);
                self.inner
                    .store_solution(pattern_id, loaded.version, sibling)
                    .await?;
                return Err(EngineError::Conflict("lost the race".to_string()));
            }
            self.inner
                .store_solution(pattern_id, expected_version, solution)
                .await
        }
    }

    #[tokio::test]
    async fn test_retry_after_conflict_folds_concurrent_trial() {
        let (inner, pattern_id, solution_id) = store_with_user_solution().await;
        let store = Arc::new(ConflictOnce {
            inner: inner.clone(),
            raced: AtomicBool::new(false),
        });
        let agg = EffectivenessAggregator::new(store, Arc::new(NullEventBus), 3);

        let updated = agg
            .record_trial(&pattern_id, solution_id, 40.0)
            .await
            .unwrap();

        // The retry re-reads; both the competing 80% trial and the
        // retried 40% trial survive.
        assert_eq!(updated.trial_count, 2);
        assert_eq!(updated.total_effectiveness, 120.0);
        assert!((updated.effectiveness - 0.60).abs() < 0.01);

        let stored = inner
            .load_solution(&pattern_id, solution_id)
            .await
            .unwrap();
        assert_eq!(stored.solution.trial_count, 2);
        assert_eq!(stored.solution.total_effectiveness, 120.0);
    }

    /// Store whose writes always conflict, to exercise retry exhaustion.
    struct AlwaysConflicting {
        inner: Arc<InMemoryPatternStore>,
    }

    #[async_trait]
    impl PatternStore for AlwaysConflicting {
        async fn find_by_species(
            &self,
            species: Species,
        ) -> Result<Vec<BehaviorPattern>, EngineError> {
            self.inner.find_by_species(species).await
        }

        async fn find_by_name_and_species(
            &self,
            name: &str,
            species: Species,
        ) -> Result<Option<BehaviorPattern>, EngineError> {
            self.inner.find_by_name_and_species(name, species).await
        }

        async fn find_by_id(
            &self,
            id: &PatternId,
        ) -> Result<Option<BehaviorPattern>, EngineError> {
            self.inner.find_by_id(id).await
        }

        async fn insert(
            &self,
            pattern: BehaviorPattern,
        ) -> Result<BehaviorPattern, EngineError> {
            self.inner.insert(pattern).await
        }

        async fn append_solution(
            &self,
            pattern_id: &PatternId,
            solution: Solution,
        ) -> Result<Solution, EngineError> {
            self.inner.append_solution(pattern_id, solution).await
        }

        async fn load_solution(
            &self,
            pattern_id: &PatternId,
            solution_id: SolutionId,
        ) -> Result<VersionedSolution, EngineError> {
            self.inner.load_solution(pattern_id, solution_id).await
        }

        async fn store_solution(
            &self,
            _pattern_id: &PatternId,
            _expected_version: u64,
            _solution: Solution,
        ) -> Result<Solution, EngineError> {
            Err(EngineError::Conflict("simulated race".to_string()))
        }
    }

    #[tokio::test]
    async fn test_retry_exhaustion_surfaces_conflict() {
        let (inner, pattern_id, solution_id) = store_with_user_solution().await;
        let store = Arc::new(AlwaysConflicting { inner });
        let agg = EffectivenessAggregator::new(store, Arc::new(NullEventBus), 3);

        let err = agg
            .record_trial(&pattern_id, solution_id, 50.0)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
    }
}
