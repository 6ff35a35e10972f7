//! HTML fragment renderer.
//!
//! Report strings arrive already escaped, so only label names are escaped
//! here.

use std::fmt::Write;

use fitment_understanding::{escape_html, Banner, FitmentReport, NormalizedBody, SectionCard, NOT_PROVIDED};

/// Banner followed by a card per section, in label order.
pub fn to_html(report: &FitmentReport) -> String {
    let mut out = String::from("<div class=\"fitment-report\">\n");
    if let Some(banner) = &report.banner {
        push_banner(&mut out, banner);
    }
    for card in &report.cards {
        push_card(&mut out, card);
    }
    out.push_str("</div>\n");
    out
}

fn push_banner(out: &mut String, banner: &Banner) {
    let status = format!("{:?}", banner.status).to_lowercase();
    let _ = writeln!(out, "<div class=\"banner banner-{status}\">");
    let _ = writeln!(
        out,
        "<span class=\"banner-icon\">{}</span><strong>{}</strong>",
        banner.icon, banner.headline
    );
    if banner.detail != banner.headline {
        let _ = writeln!(out, "<p>{}</p>", banner.detail);
    }
    out.push_str("</div>\n");
}

fn push_card(out: &mut String, card: &SectionCard) {
    let _ = writeln!(out, "<section class=\"card\">\n<h3>{}</h3>", escape_html(&card.label));
    match &card.body {
        NormalizedBody::Missing => push_missing(out),
        NormalizedBody::Prose { text } => {
            let _ = writeln!(out, "<p>{}</p>", text.replace('\n', "<br>"));
        }
        NormalizedBody::Procedure { tools, steps, numbered } => {
            out.push_str("<h4>Tools</h4>\n");
            push_list(out, tools, false);
            if !steps.is_empty() {
                out.push_str("<h4>Steps</h4>\n");
                push_list(out, steps, *numbered);
            }
        }
        NormalizedBody::Steps { items, numbered } => push_list(out, items, *numbered),
        NormalizedBody::List { items } => push_list(out, items, false),
    }
    out.push_str("</section>\n");
}

fn push_missing(out: &mut String) {
    let _ = writeln!(out, "<p class=\"muted\">{NOT_PROVIDED}</p>");
}

fn push_list(out: &mut String, items: &[String], ordered: bool) {
    let tag = if ordered { "ol" } else { "ul" };
    let _ = write!(out, "<{tag}>");
    for item in items {
        let _ = write!(out, "<li>{item}</li>");
    }
    let _ = writeln!(out, "</{tag}>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitment_core::LabelSet;

    #[test]
    fn renders_banner_and_every_card() {
        let report = FitmentReport::from_text(
            "RESULT: ❌ Not compatible\nCOMPATIBILITY: Wrong thread <M20>\nTIPS:\n- one\n- two",
            &LabelSet::default(),
        );
        let html = to_html(&report);

        assert!(html.contains("<div class=\"banner banner-fail\">"));
        assert!(html.contains("<p>Wrong thread &lt;M20&gt;</p>"));
        assert_eq!(html.matches("<section class=\"card\">").count(), 7);
        assert!(html.contains("<ul><li>one</li><li>two</li></ul>"));
    }

    #[test]
    fn missing_sections_are_muted() {
        let report = FitmentReport::from_text("RESULT: ✅ Compatible", &LabelSet::default());
        let html = to_html(&report);

        assert!(html.contains("<h3>OVERVIEW</h3>\n<p class=\"muted\">Not provided.</p>"));
        // HOW TO keeps default tools even with no steps.
        assert!(html.contains("<li>Gloves</li>"));
        assert!(!html.contains("<h4>Steps</h4>"));
    }

    #[test]
    fn tools_without_steps_omit_steps_half() {
        let report = FitmentReport::from_text("HOW TO:\nTools:\n- Wrench", &LabelSet::default());
        let html = to_html(&report);
        let start = html.find("<h3>HOW TO</h3>").unwrap();
        let card = &html[start..start + html[start..].find("</section>").unwrap()];

        assert!(card.contains("<ul><li>Wrench</li></ul>"));
        assert!(!card.contains("Steps"));
        assert!(!card.contains(NOT_PROVIDED));
    }

    #[test]
    fn numbered_steps_use_ordered_list() {
        let report = FitmentReport::from_text(
            "HOW TO:\nTools: Wrench\nSteps:\n1. Drain oil\n2. Swap filter",
            &LabelSet::default(),
        );
        assert!(to_html(&report).contains("<ol><li>Drain oil</li><li>Swap filter</li></ol>"));
    }

    #[test]
    fn no_banner_without_result_sections() {
        let report = FitmentReport::from_text("just some words", &LabelSet::default());
        assert!(!to_html(&report).contains("banner"));
    }
}
