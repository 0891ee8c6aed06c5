//! Configuration management for MedScan.
//!
//! Configuration is loaded from the platform config directory (or an explicit
//! path) with sensible defaults. All config structs implement `Default`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for MedScan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Captioning provider settings
    pub captioning: CaptioningConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Analysis settings
    pub analysis: AnalysisConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_path(&Self::default_path())
    }

    /// Load configuration from `path`, or defaults if the file doesn't exist.
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config file location: the explicit path when given (with `~`
    /// expansion), otherwise the default location.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(expand_path)
            .unwrap_or_else(Self::default_path)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.medscan.medscan/config.toml
    /// - Linux: ~/.config/medscan/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\medscan\medscan\config\config.toml
    ///
    /// Falls back to ~/.medscan/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "medscan", "medscan")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".medscan").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.captioning.provider, "huggingface");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.analysis.description_max_tokens, 200);
        assert_eq!(config.analysis.precautions_max_tokens, 150);
        assert!(config.analysis.severity_seed.is_none());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[limits]"));
        assert!(toml.contains("[analysis]"));
    }

    #[test]
    fn test_load_from_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\n\n[llm]\nprovider = \"anthropic\"\n\n[analysis]\nseverity_seed = 7\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.analysis.severity_seed, Some(7));
        assert_eq!(config.limits.max_payload_mb, 20);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nllm_timeout_ms = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("llm_timeout_ms"));
    }

    #[test]
    fn test_load_from_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_load_path_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let explicit = Path::new("/tmp/medscan-test.toml");
        assert_eq!(Config::resolve_path(Some(explicit)), explicit.to_path_buf());
        assert_eq!(Config::resolve_path(None), Config::default_path());
    }

    #[test]
    fn test_max_payload_bytes() {
        let limits = LimitsConfig {
            max_payload_mb: 2,
            ..LimitsConfig::default()
        };
        assert_eq!(limits.max_payload_bytes(), 2 * 1024 * 1024);
    }
}
