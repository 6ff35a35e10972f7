//! Environment variable handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` substitution inside string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes
//!   to a literal `${VAR}`.
//! - Well-known variables (`PORT`, `PROVIDER`, `OLLAMA_URL`, ...) that
//!   override fields after the file is parsed.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use fitment_core::FitmentError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::schema::FitmentConfig;

/// `${VAR}` or the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree using the
/// process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let var_name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Collect all env var names referenced in a config value tree.
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if caps.get(1).is_none() {
                    out.push(caps[2].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

/// Apply well-known environment overrides from the process environment.
pub fn apply_env_overrides(config: FitmentConfig) -> Result<FitmentConfig, FitmentError> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply well-known environment overrides from `env`.
///
/// Blank values are ignored.
pub fn apply_env_overrides_with(
    mut config: FitmentConfig,
    env: &HashMap<String, String>,
) -> Result<FitmentConfig, FitmentError> {
    let get = |key: &str| {
        env.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(port) = get("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| FitmentError::ConfigError(format!("PORT must be a port number, got \"{port}\"")))?;
    }
    if let Some(bind) = get("BIND") {
        config.server.bind = bind;
    }
    if let Some(kind) = get("PROVIDER") {
        config.provider.kind = kind.parse()?;
    }
    if let Some(url) = get("OLLAMA_URL") {
        config.provider.ollama_url = url;
    }
    if let Some(model) = get("OLLAMA_MODEL") {
        config.provider.ollama_model = model;
    }
    if let Some(key) = get("OPENAI_API_KEY") {
        config.provider.openai_api_key = Some(key);
    }
    if let Some(model) = get("OPENAI_MODEL") {
        config.provider.openai_model = model;
    }
    if let Some(org) = get("OPENAI_ORG") {
        config.provider.openai_organization = Some(org);
    }
    if let Some(level) = get("FITMENT_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(dir) = get("FITMENT_LOG_DIR") {
        config.logging.dir = Some(PathBuf::from(dir));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProviderKind;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"openaiApiKey": "${OPENAI_API_KEY}"});
        let env = env(&[("OPENAI_API_KEY", "sk-abc123")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["openaiApiKey"], "sk-abc123");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"provider": {"ollamaUrl": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("MISSING_VAR"));
        assert!(err.contains("provider.ollamaUrl"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"note": "cost $${DOLLARS} for ${WHO}"});
        let result = resolve_env_vars_with(&v, &env(&[("WHO", "you")])).unwrap();
        assert_eq!(result["note"], "cost ${DOLLARS} for you");
        assert_eq!(collect_referenced_vars(&v), vec!["WHO".to_string()]);
    }

    #[test]
    fn substitutes_inside_arrays() {
        let v = json!({"labels": [{"name": "${LABEL}"}]});
        let result = resolve_env_vars_with(&v, &env(&[("LABEL", "TIPS")])).unwrap();
        assert_eq!(result["labels"][0]["name"], "TIPS");
    }

    #[test]
    fn overrides_from_env() {
        let config = apply_env_overrides_with(
            FitmentConfig::default(),
            &env(&[
                ("PORT", "8088"),
                ("PROVIDER", "openai"),
                ("OPENAI_API_KEY", "sk-live"),
                ("OLLAMA_MODEL", " "),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.openai_api_key.as_deref(), Some("sk-live"));
        assert_eq!(config.provider.ollama_model, "llava");
    }

    #[test]
    fn bad_port_is_config_error() {
        let result = apply_env_overrides_with(FitmentConfig::default(), &env(&[("PORT", "http")]));
        assert!(matches!(result, Err(FitmentError::ConfigError(_))));
    }
}
