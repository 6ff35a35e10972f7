//! Config redaction: produce safe-to-log config snapshots by masking secrets.

use serde_json::Value;

static SENSITIVE_KEYS: &[&str] = &[
    "openaiApiKey",
    "openai_api_key",
    "apiKey",
    "api_key",
    "token",
    "secret",
    "password",
];

/// Redact a config JSON value, masking every sensitive field.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            // Keep a short prefix as a hint, e.g. "sk-p***".
            let hint: String = s.chars().take(4).collect();
            if s.chars().count() > 4 {
                Value::String(format!("{hint}***"))
            } else {
                Value::String("***".to_string())
            }
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_api_keys() {
        let v = json!({"provider": {"openaiApiKey": "sk-proj-abcdef", "openaiModel": "gpt-4o-mini"}});
        let r = redact(&v);
        assert_eq!(r["provider"]["openaiApiKey"], "sk-p***");
        assert_eq!(r["provider"]["openaiModel"], "gpt-4o-mini");
    }

    #[test]
    fn short_secrets_fully_masked() {
        let r = redact(&json!({"token": "abc"}));
        assert_eq!(r["token"], "***");
    }
}
