//! Assembles extracted and normalised sections into one report.

use fitment_core::LabelSet;
use serde::Serialize;

use crate::classify::{banner_source, classify, FitmentStatus, COMPATIBILITY_LABEL, RESULT_LABEL};
use crate::escape::escape_html;
use crate::normalize::{normalize, NormalizedBody};
use crate::sections::{HeadingMatcher, SectionMap};

/// One display card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCard {
    pub label: String,
    pub body: NormalizedBody,
}

/// Result banner: status, icon, escaped headline and explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub status: FitmentStatus,
    pub icon: &'static str,
    pub headline: String,
    pub detail: String,
}

impl Banner {
    fn from_sections(sections: &SectionMap) -> Option<Self> {
        let headline = banner_source(sections)?;
        let status = classify(headline);
        // Explain with COMPATIBILITY when the headline came from RESULT.
        let compatibility = sections.body(COMPATIBILITY_LABEL);
        let detail = if !sections.body(RESULT_LABEL).is_empty() && !compatibility.is_empty() {
            compatibility
        } else {
            headline
        };
        Some(Self {
            status,
            icon: status.icon(),
            headline: escape_html(headline),
            detail: escape_html(detail),
        })
    }
}

/// Display-ready view of a single model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitmentReport {
    pub sections: SectionMap,
    pub cards: Vec<SectionCard>,
    pub banner: Option<Banner>,
}

impl FitmentReport {
    pub fn from_text(raw: &str, labels: &LabelSet) -> Self {
        Self::from_sections(crate::sections::extract(raw, labels), labels)
    }

    /// Same as [`from_text`](Self::from_text) with a pre-compiled matcher.
    pub fn with_matcher(raw: &str, matcher: &HeadingMatcher) -> Self {
        Self::from_sections(matcher.extract(raw), matcher.labels())
    }

    fn from_sections(sections: SectionMap, labels: &LabelSet) -> Self {
        let cards = labels
            .labels()
            .iter()
            .map(|label| SectionCard {
                label: label.name.clone(),
                body: normalize(label, sections.body(&label.name)),
            })
            .collect();
        let banner = Banner::from_sections(&sections);
        Self {
            sections,
            cards,
            banner,
        }
    }

    pub fn status(&self) -> Option<FitmentStatus> {
        self.banner.as_ref().map(|b| b.status)
    }

    pub fn card(&self, label: &str) -> Option<&SectionCard> {
        self.cards.iter().find(|c| c.label.eq_ignore_ascii_case(label))
    }
}
