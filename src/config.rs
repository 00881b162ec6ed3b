use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "slack-about-stats.toml";
const CONFIG_DIR_NAME: &str = "slack-about-stats";

/// Debug namespace recognised in the `DEBUG` environment variable
pub const DEBUG_NAMESPACE: &str = "slack-about-service";

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn default_user_agent() -> String {
    format!("slack-about-stats/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub slack: Option<SlackConfig>,
    pub logging: Option<LoggingConfig>,
    pub stats: Option<StatsConfig>,
}

/// Settings for posting responses to Slack `response_url` webhooks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Emit debug traces for every vertex lookup
    pub trace_lookups: Option<bool>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(10),
            user_agent: Some(default_user_agent()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            trace_lookups: Some(false),
        }
    }
}

impl SlackConfig {
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(10)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(default_user_agent)
    }
}

impl Config {
    /// Load configuration from TOML file with XDG directory support and environment variable overrides
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = match config_path {
            Some(path) => path,
            None => Self::find_config_file(),
        };

        let mut config = if config_file.exists() {
            tracing::debug!("Loading config from: {}", config_file.display());
            let content = std::fs::read_to_string(&config_file)?;
            toml::from_str::<Config>(&content)?
        } else {
            tracing::debug!("No config file found, using environment variables only");
            Config::default()
        };

        config.apply_env_overrides()?;

        if config.slack.is_none() {
            config.slack = Some(SlackConfig::default());
        }
        if config.logging.is_none() {
            config.logging = Some(LoggingConfig::default());
        }
        if config.stats.is_none() {
            config.stats = Some(StatsConfig::default());
        }

        config.validate()?;

        Ok(config)
    }

    /// Find configuration file using XDG directory support
    fn find_config_file() -> PathBuf {
        if let Ok(path) = env::var("SLACK_ABOUT_STATS_CONFIG") {
            return PathBuf::from(path);
        }

        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return current_dir_config;
        }

        let xdg_config = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg_config_home))
        } else {
            env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".config"))
        }
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));

        match xdg_config {
            Some(path) if path.exists() => path,
            // Default to current directory (file may not exist yet)
            _ => current_dir_config,
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(timeout) = env::var("SLACK_ABOUT_STATS_SLACK_TIMEOUT_SECS") {
            let slack = self.slack.get_or_insert_with(SlackConfig::default);
            slack.timeout_secs = Some(timeout.parse().map_err(|_| {
                ConfigError::InvalidValue(
                    "SLACK_ABOUT_STATS_SLACK_TIMEOUT_SECS must be a valid number".to_string(),
                )
            })?);
        }
        if let Ok(user_agent) = env::var("SLACK_ABOUT_STATS_SLACK_USER_AGENT") {
            let slack = self.slack.get_or_insert_with(SlackConfig::default);
            slack.user_agent = Some(user_agent);
        }

        if let Ok(level) = env::var("SLACK_ABOUT_STATS_LOG_LEVEL") {
            let logging = self.logging.get_or_insert_with(LoggingConfig::default);
            logging.level = Some(level);
        }

        if let Ok(debug) = env::var("DEBUG") {
            if debug_enables_tracing(&debug) {
                let stats = self.stats.get_or_insert_with(StatsConfig::default);
                stats.trace_lookups = Some(true);
            }
        }
        if let Ok(trace) = env::var("SLACK_ABOUT_STATS_TRACE_LOOKUPS") {
            let stats = self.stats.get_or_insert_with(StatsConfig::default);
            stats.trace_lookups = Some(trace.parse().map_err(|_| {
                ConfigError::InvalidValue(
                    "SLACK_ABOUT_STATS_TRACE_LOOKUPS must be true or false".to_string(),
                )
            })?);
        }

        Ok(())
    }

    /// Validate that configured values are usable
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref slack) = self.slack {
            if slack.timeout_secs == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "slack.timeout_secs must be greater than zero".to_string(),
                ));
            }
            if let Some(ref user_agent) = slack.user_agent {
                if user_agent.trim().is_empty() {
                    return Err(ConfigError::MissingRequired(
                        "slack.user_agent or SLACK_ABOUT_STATS_SLACK_USER_AGENT".to_string(),
                    ));
                }
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_ref()) {
            if !VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "logging.level must be one of {}, got {level}",
                    VALID_LOG_LEVELS.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Get the slack configuration with defaults
    pub fn slack(&self) -> SlackConfig {
        self.slack.clone().unwrap_or_default()
    }

    /// Get the logging configuration with defaults
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    /// Whether vertex lookups should be traced
    pub fn trace_lookups(&self) -> bool {
        self.stats
            .as_ref()
            .and_then(|s| s.trace_lookups)
            .unwrap_or(false)
    }
}

/// Check a `DEBUG` value (comma or space separated namespaces) for the service namespace.
/// A `-namespace` entry skips matching namespaces even when another entry enables them.
pub fn debug_enables_tracing(value: &str) -> bool {
    let (skips, enables): (Vec<&str>, Vec<&str>) = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .partition(|entry| entry.starts_with('-'));

    if skips
        .into_iter()
        .filter_map(|entry| entry.strip_prefix('-'))
        .any(namespace_matches)
    {
        return false;
    }

    enables.into_iter().any(namespace_matches)
}

fn namespace_matches(pattern: &str) -> bool {
    pattern == "*"
        || pattern == DEBUG_NAMESPACE
        || pattern
            .strip_suffix('*')
            .is_some_and(|prefix| DEBUG_NAMESPACE.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let slack = SlackConfig::default();
        assert_eq!(slack.timeout_secs, Some(10));
        assert!(slack.user_agent().starts_with("slack-about-stats/"));

        let logging = LoggingConfig::default();
        assert_eq!(logging.level, Some("info".to_string()));

        let stats = StatsConfig::default();
        assert_eq!(stats.trace_lookups, Some(false));

        let config = Config::default();
        assert!(!config.trace_lookups());
        assert_eq!(config.slack().timeout_secs(), 10);
    }

    #[test]
    fn test_debug_namespace_matching() {
        assert!(debug_enables_tracing("slack-about-service"));
        assert!(debug_enables_tracing("*"));
        assert!(debug_enables_tracing("express:*, slack-about-service"));
        assert!(debug_enables_tracing("slack-about-*"));
        assert!(!debug_enables_tracing("express:*"));
        assert!(!debug_enables_tracing("-slack-about-service"));
        assert!(!debug_enables_tracing("*,-slack-about-service"));
        assert!(!debug_enables_tracing("slack-about-*,-slack-about-service"));
        assert!(!debug_enables_tracing("-slack-*, slack-about-service"));
        assert!(debug_enables_tracing("*,-express:*"));
        assert!(!debug_enables_tracing(""));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let config = Config {
            slack: Some(SlackConfig {
                timeout_secs: Some(0),
                user_agent: None,
            }),
            logging: None,
            stats: None,
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("slack.timeout_secs"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let config = Config {
            slack: None,
            logging: Some(LoggingConfig {
                level: Some("verbose".to_string()),
            }),
            stats: None,
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("logging.level"));
    }

    #[test]
    fn test_config_validation_blank_user_agent() {
        let config = Config {
            slack: Some(SlackConfig {
                timeout_secs: Some(5),
                user_agent: Some("  ".to_string()),
            }),
            logging: None,
            stats: None,
        };

        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn test_toml_parsing() {
        let toml_content = r#"
[slack]
timeout_secs = 5
user_agent = "about-bot/1.0"

[logging]
level = "debug"

[stats]
trace_lookups = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();

        assert_eq!(config.slack().timeout_secs(), 5);
        assert_eq!(config.slack().user_agent(), "about-bot/1.0");
        assert_eq!(config.logging().level, Some("debug".to_string()));
        assert!(config.trace_lookups());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_parsing_partial_sections() {
        let config: Config = toml::from_str("[stats]\n").unwrap();
        assert!(config.slack.is_none());
        assert!(!config.trace_lookups());
        assert_eq!(config.slack().timeout_secs(), 10);
    }
}
