//! Config file discovery and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config directory.
/// Priority: `FITMENT_CONFIG_DIR` env > `~/.fitment/` > `./.fitment`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FITMENT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".fitment"))
        .unwrap_or_else(|| PathBuf::from(".fitment"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Config path to use when none is given explicitly: `FITMENT_CONFIG`, else
/// `<config_dir>/config.yaml`.
pub fn default_config_path() -> PathBuf {
    std::env::var("FITMENT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config_file_path(&config_dir()))
}

/// Read the YAML file as an untyped value tree.
///
/// Returns an empty object if the file doesn't exist (first run).
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: Value = if raw.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?
    };

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty_object() {
        let value = load_raw_config(Path::new("/definitely/not/here/config.yaml"))
            .await
            .unwrap();
        assert_eq!(value, Value::Object(Default::default()));
    }

    #[tokio::test]
    async fn reads_yaml_file() {
        let path = std::env::temp_dir().join(format!("fitment-io-{}.yaml", std::process::id()));
        fs::write(&path, "server:\n  port: 9000\n").await.unwrap();
        let value = load_raw_config(&path).await.unwrap();
        fs::remove_file(&path).await.unwrap();
        assert_eq!(value["server"]["port"], 9000);
    }

    #[test]
    fn config_file_lives_in_dir() {
        assert_eq!(
            config_file_path(Path::new("/etc/fitment")),
            PathBuf::from("/etc/fitment/config.yaml")
        );
    }
}
