use serde::{Deserialize, Serialize};

use crate::error::FitmentError;

/// Expected shape of a section body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SectionKind {
    /// Free text, passed through trimmed.
    Prose,
    /// A "Tools:" list followed by "Steps:".
    HowTo,
    /// Steps on their own, numbered or not.
    Steps,
    /// Unordered bullet list with a minimum-count default.
    List(ListPolicy),
}

/// How a list section is split and when its defaults kick in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPolicy {
    /// Fewer surviving entries than this and `defaults` is used instead.
    #[serde(default)]
    pub min_entries: usize,
    #[serde(default)]
    pub defaults: Vec<String>,
    /// Also split entries on commas.
    #[serde(default)]
    pub split_commas: bool,
}

/// One heading keyword the model is asked to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub name: String,
    #[serde(flatten)]
    pub kind: SectionKind,
    /// Line placed next to the heading in the system prompt.
    #[serde(default)]
    pub instruction: String,
}

impl Label {
    pub fn new(name: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            instruction: String::new(),
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    fn list(name: &str, min_entries: usize, defaults: &[&str]) -> Self {
        Self::new(
            name,
            SectionKind::List(ListPolicy {
                min_entries,
                defaults: defaults.iter().map(|d| d.to_string()).collect(),
                split_commas: false,
            }),
        )
    }
}

/// Ordered set of section labels plus the label that receives the whole
/// reply when no heading is found.
///
/// Order is significant: headings are matched first-match in declaration
/// order, so a label that is a prefix of another must come after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<Label>,
    fallback: usize,
}

impl LabelSet {
    /// Build a label set, normalising names to uppercase.
    pub fn new(labels: Vec<Label>, fallback: &str) -> Result<Self, FitmentError> {
        if labels.is_empty() {
            return Err(FitmentError::InvalidLabels("at least one label is required".into()));
        }

        let mut normalized: Vec<Label> = Vec::with_capacity(labels.len());
        for mut label in labels {
            label.name = label.name.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
            if label.name.is_empty() {
                return Err(FitmentError::InvalidLabels("label names cannot be blank".into()));
            }
            if normalized.iter().any(|l| l.name == label.name) {
                return Err(FitmentError::InvalidLabels(format!(
                    "duplicate label \"{}\"",
                    label.name
                )));
            }
            normalized.push(label);
        }

        let fallback_name = fallback.trim().to_uppercase();
        let fallback = normalized
            .iter()
            .position(|l| l.name == fallback_name)
            .ok_or_else(|| {
                FitmentError::InvalidLabels(format!(
                    "fallback label \"{fallback_name}\" is not one of the configured labels"
                ))
            })?;

        Ok(Self {
            labels: normalized,
            fallback,
        })
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn get(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn fallback(&self) -> &Label {
        &self.labels[self.fallback]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Pairs `(earlier, later)` where the earlier label is a prefix of a later
    /// one and would shadow it whenever the remainder looks like a separator.
    pub fn prefix_collisions(&self) -> Vec<(String, String)> {
        let mut collisions = Vec::new();
        for (i, earlier) in self.labels.iter().enumerate() {
            for later in &self.labels[i + 1..] {
                if later.name.starts_with(&earlier.name) {
                    collisions.push((earlier.name.clone(), later.name.clone()));
                }
            }
        }
        collisions
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        let labels = vec![
            Label::new("RESULT", SectionKind::Prose).with_instruction(
                "Begin with one of ✅ Compatible | ⚠️ Check fitment | ❌ Not compatible, then a short reason tied to the vehicle.",
            ),
            Label::new("COMPATIBILITY", SectionKind::Prose).with_instruction(
                "Repeat the status and explain it (part number or size cues, vehicle match or mismatch).",
            ),
            Label::new("OVERVIEW", SectionKind::Prose).with_instruction(
                "Name the item in the photo and note visible markings, features or condition.",
            ),
            Label::new("SKILL LEVEL REQUIRED", SectionKind::Prose).with_instruction(
                "Rate how DIY-friendly the job is (Easy / Moderate / Pro) with a one-line rationale.",
            ),
            Label::new("HOW TO", SectionKind::HowTo).with_instruction(
                "Give \"Tools:\" as a bulleted list, then \"Steps:\" as up to 10 numbered steps including safety and pre/post work such as draining fluids or torque notes. Finish every step.",
            ),
            Label::list(
                "TIPS",
                2,
                &[
                    "Compare the old and new part side by side before installing.",
                    "Confirm the part number against your VIN or owner's manual.",
                ],
            )
            .with_instruction(
                "Two or three specific cautions or cross-checks tied to the photo and vehicle.",
            ),
            Label::list(
                "RELATED PRODUCTS",
                1,
                &["Replacement gaskets or seals for the same assembly."],
            )
            .with_instruction(
                "One or two complementary parts for the same vehicle, such as companion filters, fluids or hardware.",
            ),
        ];

        Self {
            labels,
            fallback: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_overview_fallback() {
        let set = LabelSet::default();
        assert_eq!(set.len(), 7);
        assert_eq!(set.fallback().name, "OVERVIEW");
        assert_eq!(set.labels()[0].name, "RESULT");
        assert!(set.prefix_collisions().is_empty());
    }

    #[test]
    fn names_are_normalised() {
        let set = LabelSet::new(
            vec![Label::new("  how   to ", SectionKind::HowTo), Label::new("overview", SectionKind::Prose)],
            "Overview",
        )
        .unwrap();
        assert_eq!(set.labels()[0].name, "HOW TO");
        assert!(set.get("how to").is_some());
    }

    #[test]
    fn rejects_duplicates_and_unknown_fallback() {
        let dup = LabelSet::new(
            vec![Label::new("TIPS", SectionKind::Prose), Label::new("tips", SectionKind::Prose)],
            "TIPS",
        );
        assert!(matches!(dup, Err(FitmentError::InvalidLabels(_))));

        let missing = LabelSet::new(vec![Label::new("TIPS", SectionKind::Prose)], "OVERVIEW");
        assert!(matches!(missing, Err(FitmentError::InvalidLabels(_))));
    }

    #[test]
    fn reports_shorter_label_declared_first() {
        let set = LabelSet::new(
            vec![
                Label::new("TIPS", SectionKind::Prose),
                Label::new("TIPS-SUMMARY", SectionKind::Prose),
            ],
            "TIPS",
        )
        .unwrap();
        assert_eq!(
            set.prefix_collisions(),
            vec![("TIPS".to_string(), "TIPS-SUMMARY".to_string())]
        );
    }

    #[test]
    fn label_deserializes_with_flattened_kind() {
        let label: Label = serde_json::from_str(
            r#"{"name":"TIPS","kind":"list","minEntries":2,"defaults":["a","b"]}"#,
        )
        .unwrap();
        match label.kind {
            SectionKind::List(policy) => {
                assert_eq!(policy.min_entries, 2);
                assert!(!policy.split_commas);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
