//! Terminal output utilities: ANSI styling and notes.

use fitment_understanding::FitmentStatus;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

fn status_color(status: FitmentStatus) -> &'static str {
    match status {
        FitmentStatus::Ok => GREEN,
        FitmentStatus::Warn => YELLOW,
        FitmentStatus::Fail => RED,
    }
}

/// Color the banner line and bold the section labels.
pub fn paint_report(text: &str, status: Option<FitmentStatus>) -> String {
    if supports_color() {
        style_report(text, status)
    } else {
        text.to_string()
    }
}

fn style_report(text: &str, status: Option<FitmentStatus>) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for (i, line) in text.lines().enumerate() {
        match status {
            Some(status) if i == 0 => {
                out.push_str(&format!("{}{BOLD}{line}{RESET}", status_color(status)));
            }
            _ if !line.is_empty() && !line.starts_with(' ') => {
                out.push_str(&format!("{BOLD}{line}{RESET}"));
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

/// Print a formatted INFO note to stdout.
pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

/// Print a formatted ERROR note.
pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}
