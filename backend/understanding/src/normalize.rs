//! Per-label body normalisation into render-ready structures.
//!
//! Normalisation never fails. Empty or unusable bodies degrade to the
//! "Not provided." sentinel or to the label's default list. Every string
//! that leaves this module is HTML-escaped.

use fitment_core::{Label, ListPolicy, SectionKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::escape::escape_html;

/// Shown for a prose section the model left empty.
pub const NOT_PROVIDED: &str = "Not provided.";

/// Substituted when a how-to section names no tools.
pub const DEFAULT_TOOLS: [&str; 3] = ["Gloves", "Shop rag", "Flashlight"];

/// Structured form of one section body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NormalizedBody {
    /// Nothing usable was provided.
    Missing,
    Prose { text: String },
    /// Tools list plus ordered steps. `steps` may be empty.
    Procedure {
        tools: Vec<String>,
        steps: Vec<String>,
        numbered: bool,
    },
    Steps { items: Vec<String>, numbered: bool },
    List { items: Vec<String> },
}

impl NormalizedBody {
    pub fn is_missing(&self) -> bool {
        matches!(self, NormalizedBody::Missing)
    }

    /// Prose text, or the sentinel for a missing body.
    pub fn as_prose(&self) -> Option<&str> {
        match self {
            NormalizedBody::Prose { text } => Some(text),
            NormalizedBody::Missing => Some(NOT_PROVIDED),
            _ => None,
        }
    }
}

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*•][ \t]+)+").unwrap());

static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:step[ \t]*)?\d{1,2}[.)](?:[ \t]+|$)").unwrap());

static TOOLS_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[#*]*[ \t]*(?:tools?|tools[ \t]+(?:needed|required))[ \t]*\**[ \t]*(?::\**[ \t]*(?P<rest>.*)|\**$)",
    )
    .unwrap()
});

static STEPS_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[#*]*[ \t]*(?:steps?|instructions|procedure)[ \t]*\**[ \t]*(?::\**[ \t]*(?P<rest>.*)|\**$)",
    )
    .unwrap()
});

/// Normalise `body` according to the shape expected for `label`.
pub fn normalize(label: &Label, body: &str) -> NormalizedBody {
    let body = body.trim();
    match &label.kind {
        SectionKind::Prose => normalize_prose(body),
        SectionKind::HowTo => normalize_how_to(body),
        SectionKind::Steps => {
            let (items, numbered) = split_steps(&non_blank_lines(body));
            if items.is_empty() {
                NormalizedBody::Missing
            } else {
                NormalizedBody::Steps { items, numbered }
            }
        }
        SectionKind::List(policy) => normalize_list(&label.name, policy, body),
    }
}

fn normalize_prose(body: &str) -> NormalizedBody {
    if body.is_empty() {
        NormalizedBody::Missing
    } else {
        NormalizedBody::Prose {
            text: escape_html(body),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Segment {
    Preamble,
    Tools,
    Steps,
}

fn normalize_how_to(body: &str) -> NormalizedBody {
    let lines = non_blank_lines(body);
    let has_steps_heading = lines.iter().any(|l| STEPS_HEADING_RE.is_match(l));
    let has_tools_heading = lines.iter().any(|l| TOOLS_HEADING_RE.is_match(l));

    let mut tools: Vec<String> = Vec::new();
    let mut step_lines: Vec<&str> = Vec::new();
    let mut segment = Segment::Preamble;

    for line in lines {
        if let Some(caps) = STEPS_HEADING_RE.captures(line) {
            segment = Segment::Steps;
            if let Some(rest) = caps.name("rest").map(|m| m.as_str().trim()) {
                if !rest.is_empty() {
                    step_lines.push(rest);
                }
            }
            continue;
        }
        if let Some(caps) = TOOLS_HEADING_RE.captures(line) {
            segment = Segment::Tools;
            if let Some(rest) = caps.name("rest") {
                tools.extend(split_entries(rest.as_str(), true));
            }
            continue;
        }

        segment = match segment {
            Segment::Steps => {
                step_lines.push(line);
                Segment::Steps
            }
            // Model skipped the "Steps:" heading and went straight to numbers.
            Segment::Tools if !has_steps_heading && NUMBERED_RE.is_match(line) => {
                step_lines.push(line);
                Segment::Steps
            }
            Segment::Preamble if !has_steps_heading && !has_tools_heading => {
                step_lines.push(line);
                Segment::Preamble
            }
            other => {
                tools.extend(split_entries(line, false));
                other
            }
        };
    }

    tools.retain(|t| !t.eq_ignore_ascii_case("tools") && !t.eq_ignore_ascii_case("tools:"));
    let tools = if tools.is_empty() {
        DEFAULT_TOOLS.iter().map(|t| t.to_string()).collect()
    } else {
        tools
    };

    let (steps, numbered) = split_steps(&step_lines);
    NormalizedBody::Procedure {
        tools: tools.iter().map(|t| escape_html(t)).collect(),
        steps,
        numbered,
    }
}

fn normalize_list(name: &str, policy: &ListPolicy, body: &str) -> NormalizedBody {
    let heading = format!("{name}:");
    let mut items: Vec<String> = non_blank_lines(body)
        .into_iter()
        .flat_map(|line| split_entries(line, policy.split_commas))
        .filter(|entry| !entry.eq_ignore_ascii_case(name) && !entry.eq_ignore_ascii_case(&heading))
        .collect();

    if items.len() < policy.min_entries && !policy.defaults.is_empty() {
        items = policy.defaults.clone();
    }

    if items.is_empty() {
        NormalizedBody::Missing
    } else {
        NormalizedBody::List {
            items: items.iter().map(|i| escape_html(i)).collect(),
        }
    }
}

/// Steps in source order with numeric prefixes removed.
///
/// When the model numbers its steps, unnumbered lines are continuations of
/// the step before them.
fn split_steps(lines: &[&str]) -> (Vec<String>, bool) {
    let numbered = lines.iter().any(|l| NUMBERED_RE.is_match(l));
    let mut steps: Vec<String> = Vec::new();

    for line in lines {
        let is_numbered = NUMBERED_RE.is_match(line);
        let text = NUMBERED_RE.replace(line, "");
        let text = BULLET_RE.replace(text.trim(), "");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if numbered && !is_numbered {
            if let Some(previous) = steps.last_mut() {
                previous.push(' ');
                previous.push_str(text);
                continue;
            }
        }
        steps.push(text.to_string());
    }

    (steps.iter().map(|s| escape_html(s)).collect(), numbered)
}

/// Strip bullet or number markers and optionally split on commas.
fn split_entries(line: &str, split_commas: bool) -> Vec<String> {
    let line = BULLET_RE.replace(line.trim(), "");
    let line = NUMBERED_RE.replace(line.trim(), "");
    let parts: Vec<&str> = if split_commas {
        line.split(',').collect()
    } else {
        vec![&*line]
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank_lines(body: &str) -> Vec<&str> {
    body.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}
