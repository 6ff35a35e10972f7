//! Section extraction: slices a model reply into labelled bodies.
//!
//! Headings are recognised at the start of a line, case-insensitively, in
//! label declaration order (first match, not longest match). A heading must
//! be followed by `:` / `-` or end its line, so prose such as
//! "How to remove the filter" is never read as the `HOW TO` heading.

use fitment_core::{FitmentError, LabelSet};
use regex::{Regex, RegexBuilder};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Every configured label mapped to its trimmed body, in label order.
///
/// Built once per model response; there are no public mutators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    fn empty(labels: &LabelSet) -> Self {
        Self {
            entries: labels
                .labels()
                .iter()
                .map(|l| (l.name.clone(), String::new()))
                .collect(),
        }
    }

    /// Body for `label`, or `None` if the label is not configured.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, body)| body.as_str())
    }

    /// Body for `label`, empty when absent or unknown.
    pub fn body(&self, label: &str) -> &str {
        self.get(label).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, b)| (l.as_str(), b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no label received any content.
    pub fn is_blank(&self) -> bool {
        self.entries.iter().all(|(_, body)| body.is_empty())
    }

    /// Re-serialise as `LABEL: body` blocks, skipping empty sections.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .filter(|(_, body)| !body.is_empty())
            .map(|(label, body)| format!("{label}: {body}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, body) in &self.entries {
            map.serialize_entry(label, body)?;
        }
        map.end()
    }
}

/// A heading found during the left-to-right scan.
#[derive(Debug, Clone, Copy)]
struct RawMatch {
    label: usize,
    heading_start: usize,
    body_start: usize,
}

/// Compiled heading patterns for one label set.
#[derive(Debug, Clone)]
pub struct HeadingMatcher {
    labels: LabelSet,
    /// Multi-line scanner over the whole reply.
    scan: Regex,
    /// Same pattern anchored to a single line, for residual heading cleanup.
    line: Regex,
}

impl HeadingMatcher {
    pub fn new(labels: &LabelSet) -> Result<Self, FitmentError> {
        let pattern = heading_pattern(labels);
        let build = |multi_line: bool| {
            RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .multi_line(multi_line)
                .build()
                .map_err(|e| FitmentError::InvalidLabels(e.to_string()))
        };

        Ok(Self {
            labels: labels.clone(),
            scan: build(true)?,
            line: build(false)?,
        })
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Slice `raw` into a [`SectionMap`].
    ///
    /// Text before the first heading is discarded. When the same heading
    /// appears twice the later occurrence wins. A reply with no recognised
    /// heading at all is assigned, trimmed, to the fallback label.
    pub fn extract(&self, raw: &str) -> SectionMap {
        let text = raw.replace("\r\n", "\n");
        let mut sections = SectionMap::empty(&self.labels);

        let matches = self.scan_headings(&text);
        if matches.is_empty() {
            assign_fallback(&mut sections, &self.labels, &text);
            return sections;
        }

        for (i, current) in matches.iter().enumerate() {
            let end = matches
                .get(i + 1)
                .map_or(text.len(), |next| next.heading_start);
            let span = text[current.body_start..end].trim_end();
            sections.entries[current.label].1 = self.clean_body(span);
        }

        sections
    }

    fn scan_headings(&self, text: &str) -> Vec<RawMatch> {
        self.scan
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let label = (1..caps.len()).find(|&g| caps.get(g).is_some())? - 1;
                Some(RawMatch {
                    label,
                    heading_start: whole.start(),
                    body_start: whole.end(),
                })
            })
            .collect()
    }

    /// Strip repeated heading prefixes from each line, drop blank lines and
    /// rejoin with single newlines.
    fn clean_body(&self, span: &str) -> String {
        span.lines()
            .filter_map(|line| {
                let mut line = line.trim();
                while let Some(m) = self.line.find(line) {
                    line = line[m.end()..].trim();
                    if line.is_empty() {
                        break;
                    }
                }
                (!line.is_empty()).then_some(line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Extract sections from `raw` using `labels`.
///
/// Never fails: should the heading pattern be unbuildable, the reply is
/// treated as having no headings.
pub fn extract(raw: &str, labels: &LabelSet) -> SectionMap {
    match HeadingMatcher::new(labels) {
        Ok(matcher) => matcher.extract(raw),
        Err(_) => {
            let mut sections = SectionMap::empty(labels);
            assign_fallback(&mut sections, labels, raw);
            sections
        }
    }
}

fn assign_fallback(sections: &mut SectionMap, labels: &LabelSet, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    let fallback = &labels.fallback().name;
    if let Some(entry) = sections.entries.iter_mut().find(|(name, _)| name == fallback) {
        entry.1 = trimmed.to_string();
    }
}

/// One capture group per label, alternated in declaration order.
fn heading_pattern(labels: &LabelSet) -> String {
    let alternatives: Vec<String> = labels
        .labels()
        .iter()
        .map(|label| {
            let words: Vec<String> = label.name.split(' ').map(regex::escape).collect();
            let boundary = if label
                .name
                .ends_with(|c: char| c.is_alphanumeric() || c == '_')
            {
                r"\b"
            } else {
                ""
            };
            format!("({}){boundary}", words.join(r"[ \t]+"))
        })
        .collect();

    format!(
        r"^[ \t]*(?:#{{1,6}}[ \t]*)?\**[ \t]*(?:{})[ \t]*\**[ \t]*(?:[:\-–—]|$)\**[ \t]*",
        alternatives.join("|")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitment_core::{Label, SectionKind};

    fn labels() -> LabelSet {
        LabelSet::default()
    }

    #[test]
    fn extracts_result_and_overview() {
        let sections = extract(
            "RESULT: ✅ Compatible\nOVERVIEW: Oil filter, OEM markings visible.",
            &labels(),
        );
        assert_eq!(sections.body("RESULT"), "✅ Compatible");
        assert_eq!(sections.body("OVERVIEW"), "Oil filter, OEM markings visible.");
        for (label, body) in sections.iter() {
            if label != "RESULT" && label != "OVERVIEW" {
                assert_eq!(body, "", "{label} should be empty");
            }
        }
    }

    #[test]
    fn every_label_is_present() {
        let set = labels();
        let sections = extract("TIPS: - keep it clean", &set);
        assert_eq!(sections.len(), set.len());
        for label in set.labels() {
            assert!(sections.get(&label.name).is_some());
        }
    }

    #[test]
    fn no_heading_falls_back_to_overview() {
        let text = "  Looks like a spin-on oil filter.\n\nCannot read the part number.  ";
        let sections = extract(text, &labels());
        assert_eq!(sections.body("OVERVIEW"), text.trim());
        assert!(sections
            .iter()
            .filter(|(l, _)| *l != "OVERVIEW")
            .all(|(_, b)| b.is_empty()));
    }

    #[test]
    fn blank_text_yields_blank_map() {
        assert!(extract("", &labels()).is_blank());
        assert!(extract(" \n\t \n", &labels()).is_blank());
    }

    #[test]
    fn headings_are_case_insensitive_and_accept_hyphen() {
        let sections = extract("result - ⚠️ Check fitment\nSkill Level Required: Easy", &labels());
        assert_eq!(sections.body("RESULT"), "⚠️ Check fitment");
        assert_eq!(sections.body("SKILL LEVEL REQUIRED"), "Easy");
    }

    #[test]
    fn en_and_em_dash_separators() {
        let sections = extract("RESULT – ✅ Compatible\nTIPS — - a\n- b", &labels());
        assert_eq!(sections.body("RESULT"), "✅ Compatible");
        assert_eq!(sections.body("TIPS"), "- a\n- b");
    }

    #[test]
    fn heading_without_separator_on_its_own_line() {
        let text = "TIPS\n- Check the gasket\n- Oil the seal\nRELATED PRODUCTS\n- Drain plug washer";
        let sections = extract(text, &labels());
        assert_eq!(sections.body("TIPS"), "- Check the gasket\n- Oil the seal");
        assert_eq!(sections.body("RELATED PRODUCTS"), "- Drain plug washer");
    }

    #[test]
    fn prose_starting_with_label_word_is_not_a_heading() {
        let text = "OVERVIEW: Brake pad set.\nHow to tell wear: check the indicator tab.";
        let sections = extract(text, &labels());
        assert_eq!(
            sections.body("OVERVIEW"),
            "Brake pad set.\nHow to tell wear: check the indicator tab."
        );
        assert_eq!(sections.body("HOW TO"), "");
    }

    #[test]
    fn markdown_decorated_headings() {
        let text = "**RESULT:** ✅ Compatible\n### OVERVIEW\nAir filter\n**TIPS**: - Seat the rim";
        let sections = extract(text, &labels());
        assert_eq!(sections.body("RESULT"), "✅ Compatible");
        assert_eq!(sections.body("OVERVIEW"), "Air filter");
        assert_eq!(sections.body("TIPS"), "- Seat the rim");
    }

    #[test]
    fn strips_repeated_heading_inside_body_and_blank_lines() {
        let text = "RESULT: RESULT: ✅ Compatible\n\n\nCOMPATIBILITY:\n  COMPATIBILITY:\n   Matches the 1.8L engine.  \n";
        let sections = extract(text, &labels());
        assert_eq!(sections.body("RESULT"), "✅ Compatible");
        assert_eq!(sections.body("COMPATIBILITY"), "Matches the 1.8L engine.");
    }

    #[test]
    fn heading_at_end_of_text_has_empty_body() {
        let sections = extract("OVERVIEW: Spark plug\nTIPS:", &labels());
        assert_eq!(sections.body("OVERVIEW"), "Spark plug");
        assert_eq!(sections.body("TIPS"), "");
    }

    #[test]
    fn last_duplicate_heading_wins() {
        let sections = extract("OVERVIEW: first\nTIPS: a\nOVERVIEW: second", &labels());
        assert_eq!(sections.body("OVERVIEW"), "second");
        assert_eq!(sections.body("TIPS"), "a");
    }

    #[test]
    fn preamble_before_first_heading_is_dropped() {
        let sections = extract("Sure! Here is the analysis.\nRESULT: ❌ Not compatible", &labels());
        assert_eq!(sections.body("RESULT"), "❌ Not compatible");
        assert_eq!(sections.body("OVERVIEW"), "");
    }

    #[test]
    fn crlf_line_endings() {
        let sections = extract("RESULT: ok\r\nTIPS:\r\n- one\r\n- two\r\n", &labels());
        assert_eq!(sections.body("RESULT"), "ok");
        assert_eq!(sections.body("TIPS"), "- one\n- two");
    }

    #[test]
    fn re_extracting_serialised_map_is_stable() {
        let text = "RESULT: ✅ Compatible - fits\nOVERVIEW:\nOil filter\n  Blue canister\nHOW TO: Tools:\n- Wrench\nSteps:\n1. Drain oil\n2. Swap filter\nTIPS: - Oil the gasket\n- Hand tighten";
        let set = labels();
        let first = extract(text, &set);
        let second = extract(&first.to_text(), &set);
        assert_eq!(first, second);
    }

    #[test]
    fn declaration_order_decides_prefix_collisions() {
        let text = "TIPS-SUMMARY: short version\nTIPS: - long version";

        let longer_first = LabelSet::new(
            vec![
                Label::new("TIPS-SUMMARY", SectionKind::Prose),
                Label::new("TIPS", SectionKind::Prose),
            ],
            "TIPS",
        )
        .unwrap();
        let sections = extract(text, &longer_first);
        assert_eq!(sections.body("TIPS-SUMMARY"), "short version");
        assert_eq!(sections.body("TIPS"), "- long version");

        // The shorter label wins on the hyphen separator when declared first.
        let shorter_first = LabelSet::new(
            vec![
                Label::new("TIPS", SectionKind::Prose),
                Label::new("TIPS-SUMMARY", SectionKind::Prose),
            ],
            "TIPS",
        )
        .unwrap();
        let sections = extract(text, &shorter_first);
        assert_eq!(sections.body("TIPS-SUMMARY"), "");
    }

    #[test]
    fn space_separated_longer_label_is_still_found() {
        let set = LabelSet::new(
            vec![
                Label::new("TIPS", SectionKind::Prose),
                Label::new("TIPS SUMMARY", SectionKind::Prose),
            ],
            "TIPS",
        )
        .unwrap();
        let sections = extract("TIPS SUMMARY: brief\nTIPS: full", &set);
        assert_eq!(sections.body("TIPS SUMMARY"), "brief");
        assert_eq!(sections.body("TIPS"), "full");
    }

    #[test]
    fn serializes_in_label_order() {
        let sections = extract("TIPS: a\nRESULT: b", &labels());
        let json = serde_json::to_string(&sections).unwrap();
        assert!(json.starts_with(r#"{"RESULT":"b","COMPATIBILITY":"""#));
        assert!(json.find("\"TIPS\"").unwrap() > json.find("\"HOW TO\"").unwrap());
    }
}
