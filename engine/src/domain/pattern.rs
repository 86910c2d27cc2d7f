// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Canonical behavior pattern and its owned solutions.
//!
//! A pattern is created by the seed catalog or by the synthesis
//! fallback, mutated only by appending or updating solutions, and
//! never deleted by the engine. `name` + species is unique; the store
//! enforces this and the synthesizer resolves the resulting conflict
//! as "reuse existing".
//!
//! Effectiveness is stored on the unit interval at two-decimal
//! precision. Trial reports arrive as percentages (0–100) and are
//! converted exactly once, in the aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::EngineError;
use super::species::Species;

/// Species-namespaced pattern identifier, e.g. `CAT_1f2e...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternId(pub String);

impl PatternId {
    /// Mint a fresh id for a pattern whose primary species is `species`.
    pub fn generate(species: Species) -> Self {
        Self(format!("{}_{}", species.id_prefix(), Uuid::new_v4().simple()))
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolutionId(pub Uuid);

impl SolutionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SolutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SolutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionSource {
    Expert,
    UserSubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "within_24h")]
    Within24h,
    #[serde(rename = "within_week")]
    WithinWeek,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicalFlags {
    pub needs_vet: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub related_conditions: Vec<String>,
}

impl MedicalFlags {
    /// No vet needed, no urgency, no red flags.
    pub fn all_clear() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyAdvice {
    pub level: FrequencyLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    /// 1 (mild) to 3 (severe).
    pub severity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeRelated {
    pub is_common: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typical_age_range: Option<String>,
}

/// Round to the two-decimal precision effectiveness is stored at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A single remediation technique owned by exactly one pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub id: SolutionId,
    pub text: String,
    /// Running estimate on the unit interval, two-decimal precision.
    pub effectiveness: f64,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub steps: Vec<String>,
    pub source: SolutionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub trial_count: u64,
    /// Accumulated trial percentages (0–100 each).
    #[serde(default)]
    pub total_effectiveness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_tried: Option<DateTime<Utc>>,
}

impl Solution {
    pub fn expert(
        text: impl Into<String>,
        effectiveness: f64,
        difficulty: Difficulty,
        steps: Vec<String>,
    ) -> Self {
        Self {
            id: SolutionId::new(),
            text: text.into(),
            effectiveness: round2(effectiveness.clamp(0.0, 1.0)),
            difficulty,
            steps,
            source: SolutionSource::Expert,
            submitted_by: None,
            trial_count: 0,
            total_effectiveness: 0.0,
            last_tried: None,
        }
    }

    /// Promote a helpful custom solution into a pattern: the first
    /// report counts as its initial trial.
    pub fn user_submitted(
        text: impl Into<String>,
        steps: Vec<String>,
        effectiveness_percent: f64,
        submitted_by: Option<String>,
    ) -> Self {
        Self {
            id: SolutionId::new(),
            text: text.into(),
            effectiveness: round2(effectiveness_percent / 100.0),
            difficulty: Difficulty::Medium,
            steps,
            source: SolutionSource::UserSubmitted,
            submitted_by,
            trial_count: 1,
            total_effectiveness: effectiveness_percent,
            last_tried: Some(Utc::now()),
        }
    }

    /// Safe-default solution used whenever synthesis cannot do better.
    pub fn consult_professional() -> Self {
        Self::expert(
            "Consult a veterinarian or behaviorist",
            0.5,
            Difficulty::Medium,
            vec![
                "Schedule a vet visit".to_string(),
                "Document behavior patterns".to_string(),
            ],
        )
    }
}

/// Canonical, named record describing one recognized animal behavior,
/// its causes, and remediation solutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorPattern {
    pub id: PatternId,
    pub species: Vec<Species>,
    /// Canonical slug, unique within each species it applies to.
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub causes: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<Solution>,
    #[serde(default)]
    pub medical_flags: MedicalFlags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frequency_advice: Vec<FrequencyAdvice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_related: Option<AgeRelated>,
    #[serde(default)]
    pub prevention_tips: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl BehaviorPattern {
    pub fn new(
        species: Vec<Species>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let primary = species.first().copied().unwrap_or(Species::Dog);
        Self {
            id: PatternId::generate(primary),
            species,
            name: name.into(),
            description: description.into(),
            categories: Vec::new(),
            keywords: Vec::new(),
            causes: Vec::new(),
            solutions: Vec::new(),
            medical_flags: MedicalFlags::all_clear(),
            frequency_advice: Vec::new(),
            age_related: None,
            prevention_tips: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_causes(mut self, causes: Vec<String>) -> Self {
        self.causes = causes;
        self
    }

    pub fn with_solutions(mut self, solutions: Vec<Solution>) -> Self {
        self.solutions = solutions;
        self
    }

    pub fn with_medical_flags(mut self, flags: MedicalFlags) -> Self {
        self.medical_flags = flags;
        self
    }

    pub fn with_prevention_tips(mut self, tips: Vec<String>) -> Self {
        self.prevention_tips = tips;
        self
    }

    pub fn applies_to(&self, species: Species) -> bool {
        self.species.contains(&species)
    }

    pub fn solution(&self, id: SolutionId) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.id == id)
    }

    /// Required-field check applied by the store before insert.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.species.is_empty() {
            return Err(EngineError::Validation(
                "pattern must apply to at least one species".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(EngineError::Validation(
                "pattern name must not be empty".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(EngineError::Validation(
                "pattern description must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
