// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Closed species enumeration shared by the store, the scoring engine
//! and synthesis validation. Unknown values are rejected at every
//! boundary rather than carried through as free-form strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Rabbit,
    Bird,
    Cow,
    Sheep,
}

impl Species {
    pub const ALL: [Species; 6] = [
        Species::Dog,
        Species::Cat,
        Species::Rabbit,
        Species::Bird,
        Species::Cow,
        Species::Sheep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Rabbit => "rabbit",
            Species::Bird => "bird",
            Species::Cow => "cow",
            Species::Sheep => "sheep",
        }
    }

    /// Uppercase prefix used when minting species-namespaced pattern ids.
    pub fn id_prefix(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dog" => Ok(Species::Dog),
            "cat" => Ok(Species::Cat),
            "rabbit" => Ok(Species::Rabbit),
            "bird" => Ok(Species::Bird),
            "cow" => Ok(Species::Cow),
            "sheep" => Ok(Species::Sheep),
            other => Err(EngineError::Validation(format!(
                "unknown species: '{other}'"
            ))),
        }
    }
}
