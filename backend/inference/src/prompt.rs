//! Prompt construction for the vision model.

use fitment_core::{LabelSet, VehicleDetails};

const PREAMBLE: &str = "You are a concise automotive fitment assistant. \
Output exactly the headings below, each followed by a colon, and under each heading write only that section's content. \
Never repeat a heading inside a section. \
Keep every section to one or two short lines, except HOW TO which may have up to 10 numbered steps; finish every step.";

const CLOSING: &str = "Be brief and specific, using the photo and the vehicle details provided. \
Every heading must have content.";

/// System prompt listing every configured heading in match order.
pub fn build_system_prompt(labels: &LabelSet) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push('\n');
    for label in labels.labels() {
        prompt.push_str(&label.name);
        prompt.push(':');
        if !label.instruction.is_empty() {
            prompt.push(' ');
            prompt.push_str(&label.instruction);
        }
        prompt.push('\n');
    }
    prompt.push_str(CLOSING);
    prompt
}

/// User turn carrying the vehicle details.
pub fn build_user_prompt(details: &VehicleDetails) -> String {
    let or_unknown = |s: &str| {
        let s = s.trim();
        if s.is_empty() { "Unknown".to_string() } else { s.to_string() }
    };

    let mut lines = vec![
        format!("Year: {}", or_unknown(&details.year)),
        format!("Make: {}", or_unknown(&details.make)),
        format!("Model: {}", or_unknown(&details.model)),
    ];
    if let Some(url) = details.product_url() {
        lines.push(format!("Product URL: {url}"));
    }
    if !details.notes.trim().is_empty() {
        lines.push(format!("Notes: {}", details.notes.trim()));
    }

    format!(
        "Analyse this car part photo for fitment. Use these vehicle details:\n{}",
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitment_core::{Label, SectionKind};

    #[test]
    fn system_prompt_lists_labels_in_order() {
        let prompt = build_system_prompt(&LabelSet::default());
        let result = prompt.find("\nRESULT: ").unwrap();
        let how_to = prompt.find("\nHOW TO: ").unwrap();
        let related = prompt.find("\nRELATED PRODUCTS: ").unwrap();
        assert!(result < how_to && how_to < related);
        assert!(prompt.ends_with(CLOSING));
    }

    #[test]
    fn label_without_instruction_is_bare_heading() {
        let labels = LabelSet::new(vec![Label::new("OVERVIEW", SectionKind::Prose)], "OVERVIEW").unwrap();
        assert!(build_system_prompt(&labels).contains("\nOVERVIEW:\n"));
    }

    #[test]
    fn user_prompt_includes_url_only_when_present() {
        let mut details = VehicleDetails {
            year: "2012".into(),
            make: "Ford".into(),
            model: "Focus".into(),
            product_url: None,
            notes: "Front brake pads".into(),
        };
        let prompt = build_user_prompt(&details);
        assert!(prompt.contains("Year: 2012\nMake: Ford\nModel: Focus\nNotes: Front brake pads"));
        assert!(!prompt.contains("Product URL"));

        details.product_url = Some("https://parts.example/pads".into());
        assert!(build_user_prompt(&details).contains("Product URL: https://parts.example/pads"));
    }
}
