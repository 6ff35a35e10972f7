//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings (typically raw upstream
//! error bodies) before they are logged.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{16,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

static DATA_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data:image/[a-z0-9.+\-]+;base64,[A-Za-z0-9+/=]{64,}").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    // Echoed image payloads are noise, not secrets, but they swamp the log.
    DATA_URL_RE
        .replace_all(&redacted, "[IMAGE_DATA]")
        .into_owned()
}
