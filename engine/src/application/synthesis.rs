// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Synthesis fallback: invoked only when no stored pattern matched.
//!
//! Builds a generation prompt that steers the model toward reusing
//! known general categories, parses the structured response, and
//! validates every field before the store is touched. Generation or
//! parse failures never surface to the caller; the safe-default
//! consult-a-professional pattern is persisted instead, so the
//! matcher always has something to return.

use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::EventBus;
use crate::domain::{
    BehaviorEvent, BehaviorPattern, Difficulty, EngineError, GenerationOutcome,
    GenerationService, MedicalFlags, MedicalFlagsPayload, NewPatternPayload, PatternId, Solution,
    SolutionPayload, Species, Urgency,
};
use crate::infrastructure::PatternStore;

pub struct PatternSynthesizer {
    store: Arc<dyn PatternStore>,
    generator: Arc<dyn GenerationService>,
    event_bus: Arc<dyn EventBus>,
    general_categories: Vec<String>,
}

impl PatternSynthesizer {
    pub fn new(
        store: Arc<dyn PatternStore>,
        generator: Arc<dyn GenerationService>,
        event_bus: Arc<dyn EventBus>,
        general_categories: Vec<String>,
    ) -> Self {
        Self {
            store,
            generator,
            event_bus,
            general_categories,
        }
    }

    /// Resolve a description with no database match to a persisted
    /// pattern. Never fails on generation errors.
    pub async fn synthesize(
        &self,
        description: &str,
        species: Species,
    ) -> Result<BehaviorPattern, EngineError> {
        let prompt = self.build_prompt(description, species);

        let outcome = match self.generator.complete(&prompt).await {
            Ok(raw) => GenerationOutcome::parse(&raw),
            Err(e) => {
                warn!(species = %species, error = %e, "generation call failed, using safe default");
                GenerationOutcome::Unparsable
            }
        };

        match outcome {
            GenerationOutcome::UseExisting(name) => {
                if let Some(existing) = self
                    .store
                    .find_by_name_and_species(&name, species)
                    .await?
                {
                    info!(pattern = %existing.id, name = %name, "reusing existing general category");
                    return Ok(existing);
                }
                // The directive referenced a category we don't have;
                // create from the raw description instead of failing.
                debug!(name = %name, "reuse directive referenced unknown pattern");
                self.persist(fallback_pattern(description, species), species, true)
                    .await
            }
            GenerationOutcome::NewPattern(payload) => {
                let fallback = payload.name.is_none();
                let pattern = coerce_payload(*payload, description, species);
                self.persist(pattern, species, fallback).await
            }
            GenerationOutcome::Unparsable => {
                self.persist(fallback_pattern(description, species), species, true)
                    .await
            }
        }
    }

    async fn persist(
        &self,
        pattern: BehaviorPattern,
        species: Species,
        fallback: bool,
    ) -> Result<BehaviorPattern, EngineError> {
        let name = pattern.name.clone();
        match self.store.insert(pattern).await {
            Ok(stored) => {
                if let Err(e) = self
                    .event_bus
                    .publish(BehaviorEvent::PatternSynthesized {
                        pattern_id: stored.id.clone(),
                        species,
                        name: stored.name.clone(),
                        fallback,
                        timestamp: Utc::now(),
                    })
                    .await
                {
                    warn!(error = %e, "failed to publish synthesis event");
                }
                Ok(stored)
            }
            Err(EngineError::Conflict(_)) => {
                // A concurrent synthesis minted the same category
                // first; resolve to it instead of duplicating.
                self.store
                    .find_by_name_and_species(&name, species)
                    .await?
                    .ok_or_else(|| {
                        EngineError::NotFound(format!(
                            "pattern '{name}' conflicted on insert but cannot be found"
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }

    fn build_prompt(&self, description: &str, species: Species) -> String {
        let categories = self
            .general_categories
            .iter()
            .map(|c| format!("     - {c}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You're a veterinary behavior expert. Analyze this pet behavior description:

  "{description}"

  Species: {species}

  Before creating a new behavior pattern:

  1. Consider if this fits any common general behavior categories:
{categories}

  2. Only create a specific new pattern if it's truly unique and doesn't fit existing categories.

  3. If it fits a general category, use that instead of creating something overly specific.

  Return a complete JSON object matching this schema if a new pattern is truly needed:
  {{
    "species": ["{species}"],
    "name": "general_category_name",
    "description": "detailed description",
    "categories": ["category1", "category2"],
    "keywords": ["keyword1", "keyword2"],
    "causes": ["cause1", "cause2"],
    "solutions": [{{
      "solution": "solution description",
      "effectiveness": 0.8,
      "implementation": "easy|medium|hard",
      "steps": ["step1", "step2"]
    }}],
    "medical_flags": {{
      "needs_vet": false,
      "urgency": null,
      "red_flags": [],
      "related_conditions": []
    }},
    "prevention_tips": ["tip1", "tip2"]
  }}

  If this behavior clearly fits an existing general category, return ONLY this:
  {{"use_existing": "general_category_name"}}"#
        )
    }
}

/// Safe-default pattern used when generation fails or parses to nothing useful.
pub(crate) fn fallback_pattern(description: &str, species: Species) -> BehaviorPattern {
    let mut pattern = BehaviorPattern::new(
        vec![species],
        format!("custom_{}", Utc::now().timestamp_millis()),
        description,
    )
    .with_categories(vec!["custom".to_string()])
    .with_causes(vec!["Unknown".to_string()])
    .with_solutions(vec![Solution::consult_professional()]);
    pattern.id = PatternId::generate(species);
    pattern
}

/// Validate and coerce a generation payload against the pattern
/// schema, substituting safe defaults for anything missing or invalid.
fn coerce_payload(
    payload: NewPatternPayload,
    description: &str,
    species: Species,
) -> BehaviorPattern {
    // Unknown species values are dropped; the requested species is
    // always present.
    let mut species_list: Vec<Species> = payload
        .species
        .unwrap_or_default()
        .iter()
        .filter_map(|s| Species::from_str(s).ok())
        .collect();
    if !species_list.contains(&species) {
        species_list.insert(0, species);
    }

    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("custom_{}", Utc::now().timestamp_millis()));

    let solutions: Vec<Solution> = {
        let coerced: Vec<Solution> = payload
            .solutions
            .unwrap_or_default()
            .into_iter()
            .map(coerce_solution)
            .collect();
        if coerced.is_empty() {
            vec![Solution::consult_professional()]
        } else {
            coerced
        }
    };

    let mut pattern = BehaviorPattern::new(
        species_list,
        name,
        payload
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| description.to_string()),
    )
    .with_categories(
        payload
            .categories
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| vec!["custom".to_string()]),
    )
    .with_keywords(payload.keywords.unwrap_or_default())
    .with_causes(
        payload
            .causes
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| vec!["Unknown".to_string()]),
    )
    .with_solutions(solutions)
    .with_medical_flags(coerce_medical_flags(payload.medical_flags))
    .with_prevention_tips(payload.prevention_tips.unwrap_or_default());
    pattern.id = PatternId::generate(species);
    pattern
}

fn coerce_solution(payload: SolutionPayload) -> Solution {
    let difficulty = match payload.implementation.as_deref() {
        Some("easy") => Difficulty::Easy,
        Some("hard") => Difficulty::Hard,
        _ => Difficulty::Medium,
    };
    let default = Solution::consult_professional();
    Solution::expert(
        payload
            .solution
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default.text),
        payload.effectiveness.unwrap_or(0.5),
        difficulty,
        payload.steps.unwrap_or(default.steps),
    )
}

fn coerce_medical_flags(payload: Option<MedicalFlagsPayload>) -> MedicalFlags {
    let Some(payload) = payload else {
        return MedicalFlags::all_clear();
    };
    let urgency = match payload.urgency.as_deref() {
        Some("immediate") => Some(Urgency::Immediate),
        Some("within_24h") => Some(Urgency::Within24h),
        Some("within_week") => Some(Urgency::WithinWeek),
        _ => None,
    };
    MedicalFlags {
        needs_vet: payload.needs_vet.unwrap_or(false),
        urgency,
        red_flags: payload.red_flags.unwrap_or_default(),
        related_conditions: payload.related_conditions.unwrap_or_default(),
    }
}
