// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Engine-wide error type.
//!
//! `Validation` and `NotFound` are surfaced to callers and reject the
//! request. `Conflict` is raised when an optimistic solution update
//! loses a race; the aggregator retries with a fresh read before
//! letting it escape. `Generation` never escapes `match_behavior` —
//! the synthesizer degrades to the safe-default pattern instead.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("concurrent update conflict: {0}")]
    Conflict(String),

    #[error("generation service error: {0}")]
    Generation(String),
}
