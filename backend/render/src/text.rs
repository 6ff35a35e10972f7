//! Plain-text renderer for terminals and logs.

use fitment_understanding::{unescape_html, FitmentReport, NormalizedBody, NOT_PROVIDED};

pub fn to_plain_text(report: &FitmentReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(banner) = &report.banner {
        let headline = unescape_html(&banner.headline);
        if headline.starts_with(banner.icon) {
            lines.push(headline);
        } else {
            lines.push(format!("{} {headline}", banner.icon));
        }
        if banner.detail != banner.headline {
            lines.push(unescape_html(&banner.detail));
        }
        lines.push(String::new());
    }

    for card in &report.cards {
        lines.push(card.label.clone());
        match &card.body {
            NormalizedBody::Missing => lines.push(format!("  {NOT_PROVIDED}")),
            NormalizedBody::Prose { text } => {
                lines.extend(unescape_html(text).lines().map(|l| format!("  {l}")));
            }
            NormalizedBody::Procedure { tools, steps, numbered } => {
                let tools: Vec<String> = tools.iter().map(|t| unescape_html(t)).collect();
                lines.push(format!("  Tools: {}", tools.join(", ")));
                push_items(&mut lines, steps, *numbered);
            }
            NormalizedBody::Steps { items, numbered } => push_items(&mut lines, items, *numbered),
            NormalizedBody::List { items } => push_items(&mut lines, items, false),
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_items(lines: &mut Vec<String>, items: &[String], numbered: bool) {
    for (i, item) in items.iter().enumerate() {
        let item = unescape_html(item);
        if numbered {
            lines.push(format!("  {}. {item}", i + 1));
        } else {
            lines.push(format!("  - {item}"));
        }
    }
}
