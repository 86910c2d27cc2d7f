// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Domain layer: species, patterns, solutions, observation logs,
//! scoring, generation contracts, events and errors.

pub mod config;
pub mod error;
pub mod events;
pub mod generation;
pub mod observation;
pub mod pattern;
pub mod scoring;
pub mod species;

pub use config::*;
pub use error::*;
pub use events::*;
pub use generation::*;
pub use observation::*;
pub use pattern::*;
pub use scoring::*;
pub use species::*;
