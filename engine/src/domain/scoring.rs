// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Pure multi-stage scoring of a free-text description against one
//! candidate pattern.
//!
//! Rules fire in strict precedence order:
//! 1. exact-name match (whole word, underscores flex to `-`/`_`/space)
//!    scores 100 and short-circuits;
//! 2. keyword match scores `50 + 5k` for `k` matched keywords;
//! 3. semantic token overlap scores `30 + 3c` for `c >= 3` common
//!    tokens, kept only when strictly greater than the keyword score.
//!
//! Regexes are pure functions of the keyword text; nothing here holds
//! state between calls.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::pattern::BehaviorPattern;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("static regex"));

/// How a description was resolved to a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactName,
    Keyword,
    Semantic,
    /// Pattern minted by the synthesis fallback.
    New,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternScore {
    pub score: u32,
    pub match_type: MatchType,
}

impl PatternScore {
    pub const NONE: PatternScore = PatternScore {
        score: 0,
        match_type: MatchType::None,
    };

    pub fn is_match(&self) -> bool {
        self.score > 0
    }
}

/// Whole-word regex for a pattern name; underscores in the slug match
/// hyphens, underscores or whitespace in the description.
fn name_regex(name: &str) -> Option<Regex> {
    let body = name
        .split('_')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[-_\s]");
    Regex::new(&format!(r"(?i)\b{body}\b")).ok()
}

/// Whole-word regex for a keyword; internal whitespace in multi-word
/// keywords matches any whitespace run.
fn keyword_regex(keyword: &str) -> Option<Regex> {
    let parts: Vec<String> = keyword.split_whitespace().map(|p| regex::escape(&p.to_lowercase())).collect();
    if parts.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b{}\b", parts.join(r"\s+"))).ok()
}

/// Candidate keyword set: name words longer than 3 chars, explicit
/// keywords, description words longer than 4 chars; deduplicated
/// case-insensitively.
fn candidate_keywords(pattern: &BehaviorPattern) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keywords = Vec::new();
    let mut push = |word: &str| {
        let normalized = word.to_lowercase();
        if seen.insert(normalized.clone()) {
            keywords.push(normalized);
        }
    };

    for word in pattern.name.split('_').filter(|w| w.len() > 3) {
        push(word);
    }
    for keyword in &pattern.keywords {
        if !keyword.trim().is_empty() {
            push(keyword.trim());
        }
    }
    for word in NON_WORD.split(&pattern.description).filter(|w| w.len() > 4) {
        push(word);
    }

    keywords
}

fn tokens(text: &str) -> Vec<String> {
    NON_WORD
        .split(&text.to_lowercase())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Score one pattern against a description. Returns
/// [`PatternScore::NONE`] when no rule produces a positive score.
pub fn score(description: &str, pattern: &BehaviorPattern) -> PatternScore {
    // 1. Exact name match short-circuits everything else.
    if let Some(re) = name_regex(&pattern.name) {
        if re.is_match(description) {
            return PatternScore {
                score: 100,
                match_type: MatchType::ExactName,
            };
        }
    }

    let mut best = PatternScore::NONE;

    // 2. Keyword matching.
    let matched = candidate_keywords(pattern)
        .iter()
        .filter_map(|k| keyword_regex(k))
        .filter(|re| re.is_match(description))
        .count() as u32;
    if matched > 0 {
        best = PatternScore {
            score: 50 + 5 * matched,
            match_type: MatchType::Keyword,
        };
    }

    // 3. Semantic token overlap, kept only when strictly better.
    // A word repeated in the pattern description counts once per
    // occurrence, not once per distinct token.
    let description_tokens: HashSet<String> = tokens(description).into_iter().collect();
    let common = tokens(&pattern.description)
        .into_iter()
        .filter(|t| t.len() > 3 && description_tokens.contains(t))
        .count() as u32;
    if common >= 3 {
        let semantic = 30 + 3 * common;
        if semantic > best.score {
            best = PatternScore {
                score: semantic,
                match_type: MatchType::Semantic,
            };
        }
    }

    best
}
