//! Fitment status classification for the result banner.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sections::SectionMap;

pub const RESULT_LABEL: &str = "RESULT";
pub const COMPATIBILITY_LABEL: &str = "COMPATIBILITY";

/// Banner status. Unknown wording is `Warn`, never `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitmentStatus {
    Ok,
    Warn,
    Fail,
}

impl FitmentStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            FitmentStatus::Ok => "✅",
            FitmentStatus::Warn => "⚠️",
            FitmentStatus::Fail => "❌",
        }
    }
}

static COMPATIBLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcompatible\b").unwrap());

// Negation anywhere earlier in the same clause cancels "compatible".
static NEGATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:not|non|never)\b|n't\b").unwrap());

static CAUTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:check|verify)").unwrap());

static NEGATIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:not|incompatible|non[\s-]*compatible|isn't|aren't|won't fit|does not fit)\b").unwrap());

/// Classify free text as ok / warn / fail.
pub fn classify(text: &str) -> FitmentStatus {
    let lower = text.to_lowercase();

    let affirmative = COMPATIBLE_RE
        .find_iter(&lower)
        .any(|m| !NEGATION_RE.is_match(clause_before(&lower, m.start())));
    if lower.contains('✅') || affirmative {
        return FitmentStatus::Ok;
    }
    if lower.contains('⚠') || CAUTION_RE.is_match(&lower) {
        return FitmentStatus::Warn;
    }
    if lower.contains('❌') || NEGATIVE_RE.is_match(&lower) {
        return FitmentStatus::Fail;
    }
    FitmentStatus::Warn
}

/// Text between the last clause break and `end`.
fn clause_before(text: &str, end: usize) -> &str {
    let head = &text[..end];
    let start = head
        .rfind(|c: char| matches!(c, '.' | ';' | ',' | '\n'))
        .map_or(0, |i| i + 1);
    &head[start..]
}

/// Status for the banner, from RESULT or else COMPATIBILITY.
/// `None` when neither section has content.
pub fn banner_status(sections: &SectionMap) -> Option<FitmentStatus> {
    banner_source(sections).map(classify)
}

pub(crate) fn banner_source(sections: &SectionMap) -> Option<&str> {
    [RESULT_LABEL, COMPATIBILITY_LABEL]
        .into_iter()
        .map(|label| sections.body(label))
        .find(|body| !body.is_empty())
}
