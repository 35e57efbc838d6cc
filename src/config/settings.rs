//! Configuration settings for Chorus.

use crate::error::{ChorusError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub engine: EngineSettings,
    pub model: ModelSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// What happens when a tool name is registered twice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Last registration wins.
    #[default]
    Overwrite,
    /// Registration fails.
    Reject,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(DuplicatePolicy::Overwrite),
            "reject" | "error" => Ok(DuplicatePolicy::Reject),
            _ => Err(format!("Unknown duplicate tool policy: {}", s)),
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::Overwrite => write!(f, "overwrite"),
            DuplicatePolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Conversation loop limits and registry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum model calls per agent invocation. None = unbounded.
    pub max_turns: Option<usize>,
    /// Maximum agent-as-tool nesting depth. None = unbounded.
    pub max_depth: Option<usize>,
    /// Duplicate tool registration policy.
    pub duplicate_tools: DuplicatePolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_turns: Some(25),
            max_depth: Some(8),
            duplicate_tools: DuplicatePolicy::Overwrite,
        }
    }
}

/// Model service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model used by agents that do not name one.
    pub default_model: String,
    /// Model used by the transcript cleaner tool.
    pub cleaner_model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            default_model: "gpt-5-mini".to_string(),
            cleaner_model: "gpt-5-mini".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ChorusError::Config(e.to_string()))
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chorus")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.engine.max_turns, Some(25));
        assert_eq!(settings.engine.max_depth, Some(8));
        assert_eq!(settings.engine.duplicate_tools, DuplicatePolicy::Overwrite);
        assert_eq!(settings.model.default_model, "gpt-5-mini");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nmax_turns = 3\nduplicate_tools = \"reject\"").unwrap();

        let settings = Settings::load_from(Some(file.path())).unwrap();
        assert_eq!(settings.engine.max_turns, Some(3));
        assert_eq!(settings.engine.max_depth, Some(8));
        assert_eq!(settings.engine.duplicate_tools, DuplicatePolicy::Reject);
        assert_eq!(settings.model.timeout_secs, 300);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.general.log_level, "warn");
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!("Reject".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Reject);
        assert_eq!("overwrite".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Overwrite);
        assert!("sometimes".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let rendered = Settings::default().to_toml().unwrap();
        assert!(rendered.contains("[engine]"));
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.model.cleaner_model, "gpt-5-mini");
    }
}
