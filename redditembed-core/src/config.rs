use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Discord rejects uploads above this size for non-boosted guilds.
pub const DEFAULT_FILE_SIZE_LIMIT: u64 = 8_000_000;

pub const DEFAULT_LOG_FILTER: &str =
    "redditembed=info,discord_bot=info,video_fetch=info,reddit_client=info";

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Explicit ffmpeg binary; looked up on `PATH` when unset.
    pub ffmpeg_path: Option<PathBuf>,
    #[serde(default = "default_size_limit")]
    pub size_limit_bytes: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_user_agent() -> String {
    format!("redditembed/{}", env!("CARGO_PKG_VERSION"))
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("videos")
}

fn default_size_limit() -> u64 {
    DEFAULT_FILE_SIZE_LIMIT
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            ffmpeg_path: None,
            size_limit_bytes: default_size_limit(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BotConfig {
    /// Read the TOML file at `path`, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut config = Self::from_toml(&raw)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Secrets may come from the environment instead of the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN") {
            self.discord.token = token;
        }
        if let Some(id) = lookup("REDDIT_CLIENT_ID") {
            self.reddit.client_id = id;
        }
        if let Some(secret) = lookup("REDDIT_CLIENT_SECRET") {
            self.reddit.client_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("discord.token", &self.discord.token),
            ("reddit.client_id", &self.reddit.client_id),
            ("reddit.client_secret", &self.reddit.client_secret),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        if self.video.size_limit_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "video.size_limit_bytes".to_string(),
                value: "0".to_string(),
            });
        }
        if self.reddit.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "Reddit requires a non-empty user agent".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
log_filter = "redditembed=debug"

[discord]
token = "discord-token"

[reddit]
client_id = "id"
client_secret = "secret"
user_agent = "test-agent/1.0"

[video]
work_dir = "/tmp/redditembed"
size_limit_bytes = 25000000
"#;

    #[test]
    fn test_parse_full_config() {
        let config = BotConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.discord.token, "discord-token");
        assert_eq!(config.reddit.user_agent, "test-agent/1.0");
        assert_eq!(config.video.work_dir, PathBuf::from("/tmp/redditembed"));
        assert_eq!(config.video.size_limit_bytes, 25_000_000);
        assert_eq!(config.video.request_timeout_secs, 60);
        assert!(config.video.ffmpeg_path.is_none());
        assert_eq!(config.log_filter, "redditembed=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply_to_empty_file() {
        let config = BotConfig::from_toml("").unwrap();
        assert_eq!(config.video.size_limit_bytes, DEFAULT_FILE_SIZE_LIMIT);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.reddit.user_agent.starts_with("redditembed/"));
    }

    #[test]
    fn test_validate_reports_missing_token() {
        let config = BotConfig::from_toml("").unwrap();
        match config.validate() {
            Err(ConfigError::MissingField { field }) => assert_eq!(field, "discord.token"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides_replace_secrets() {
        let mut config = BotConfig::from_toml("").unwrap();
        let env: HashMap<&str, &str> = [
            ("DISCORD_TOKEN", "from-env"),
            ("REDDIT_CLIENT_ID", "env-id"),
            ("REDDIT_CLIENT_SECRET", "env-secret"),
        ]
        .into_iter()
        .collect();

        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.discord.token, "from-env");
        assert_eq!(config.reddit.client_id, "env-id");
        assert_eq!(config.reddit.client_secret, "env-secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_size_limit_rejected() {
        let mut config = BotConfig::from_toml(SAMPLE).unwrap();
        config.video.size_limit_bytes = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = BotConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = BotConfig::from_toml("[discord\ntoken = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
