// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Behavior observation logs, owned by the calling layer and consumed
//! read-only here. The engine walks a log's tried solutions to drive
//! the effectiveness aggregator, and can triage active logs by
//! urgency; status transitions stay with the caller.

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::pattern::{BehaviorPattern, PatternId, SolutionId, SolutionSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Active,
    Resolved,
    Escalated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservedFrequency {
    Once,
    Daily,
    Weekly,
    Constantly,
}

/// One reported attempt at a solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriedSolution {
    /// Reference into the pattern's solution list, when the caller
    /// tried a suggested solution rather than a custom one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_id: Option<SolutionId>,
    pub text: String,
    pub helped_resolve: bool,
    /// Reported on the 0–100 percentage scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effectiveness_percent: Option<f64>,
    #[serde(default)]
    pub steps_followed: Vec<String>,
    pub source: SolutionSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorObservationLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_id: Option<PatternId>,
    /// Free-text behavior when no pattern fits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_behavior: Option<String>,
    /// Identity of the reporting user, carried onto promoted solutions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
    pub frequency: ObservedFrequency,
    /// 1 (mild) to 5 (severe).
    pub intensity: u8,
    #[serde(default)]
    pub tried: Vec<TriedSolution>,
    pub status: LogStatus,
}

impl BehaviorObservationLog {
    /// A log must reference a pattern or carry a custom behavior.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.pattern_id.is_none() && self.custom_behavior.is_none() {
            return Err(EngineError::Validation(
                "observation log needs a pattern reference or a custom behavior".to_string(),
            ));
        }
        Ok(())
    }
}

/// Urgency classification of an active observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageLevel {
    Urgent,
    Concerning,
    Normal,
}

/// Classify one observation: a pattern flagged for the vet is urgent;
/// high intensity or constant frequency is concerning.
pub fn triage(log: &BehaviorObservationLog, pattern: Option<&BehaviorPattern>) -> TriageLevel {
    if pattern.map(|p| p.medical_flags.needs_vet).unwrap_or(false) {
        TriageLevel::Urgent
    } else if log.intensity > 3 || log.frequency == ObservedFrequency::Constantly {
        TriageLevel::Concerning
    } else {
        TriageLevel::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pattern::MedicalFlags;
    use crate::domain::species::Species;

    fn log(intensity: u8, frequency: ObservedFrequency) -> BehaviorObservationLog {
        BehaviorObservationLog {
            pattern_id: Some(PatternId("CAT_test".to_string())),
            custom_behavior: None,
            reported_by: None,
            frequency,
            intensity,
            tried: Vec::new(),
            status: LogStatus::Active,
        }
    }

    #[test]
    fn test_validate_requires_pattern_or_custom() {
        let mut l = log(1, ObservedFrequency::Once);
        l.pattern_id = None;
        assert!(l.validate().is_err());
        l.custom_behavior = Some("spins before eating".to_string());
        assert!(l.validate().is_ok());
    }

    #[test]
    fn test_triage_needs_vet_is_urgent() {
        let pattern = BehaviorPattern::new(vec![Species::Dog], "limping", "Favors one leg")
            .with_medical_flags(MedicalFlags {
                needs_vet: true,
                ..MedicalFlags::all_clear()
            });
        assert_eq!(
            triage(&log(1, ObservedFrequency::Once), Some(&pattern)),
            TriageLevel::Urgent
        );
    }

    #[test]
    fn test_triage_intensity_and_frequency() {
        assert_eq!(
            triage(&log(4, ObservedFrequency::Once), None),
            TriageLevel::Concerning
        );
        assert_eq!(
            triage(&log(1, ObservedFrequency::Constantly), None),
            TriageLevel::Concerning
        );
        assert_eq!(
            triage(&log(2, ObservedFrequency::Daily), None),
            TriageLevel::Normal
        );
    }
}
