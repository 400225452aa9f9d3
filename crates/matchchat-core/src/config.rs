//! Configuration — YAML config + env var overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::{parse_cursor, MatchId, MessageId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin serving /api/send-message/ and /api/get-messages/
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Conversation this panel is bound to
    #[serde(default)]
    pub match_id: Option<MatchId>,

    /// Id of the last message already on screen (cursor seed)
    #[serde(default)]
    pub last_message_id: Option<String>,

    /// Sent as X-CSRFToken and as the csrftoken cookie
    #[serde(default)]
    pub csrf_token: Option<String>,

    /// Sent as the sessionid cookie
    #[serde(default)]
    pub session_id: Option<String>,

    /// Milliseconds between background fetches
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request timeout. Unset means requests may hang indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_poll_interval_ms() -> u64 {
    5000
}

impl Config {
    /// Load config from a YAML file with env var overrides.
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        let mut config: Config =
            serde_yaml::from_str(&content).context("Failed to parse matchchat.yaml")?;

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from the default location (dir/matchchat.yaml)
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join("matchchat.yaml"))
    }

    /// Build config from defaults and env vars only.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("MATCHCHAT_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(id) = std::env::var("MATCHCHAT_MATCH_ID") {
            let id = id
                .trim()
                .parse()
                .with_context(|| format!("MATCHCHAT_MATCH_ID is not an integer: {}", id))?;
            self.match_id = Some(id);
        }
        if let Ok(last) = std::env::var("MATCHCHAT_LAST_MESSAGE_ID") {
            self.last_message_id = Some(last);
        }
        if let Ok(token) = std::env::var("MATCHCHAT_CSRF_TOKEN") {
            self.csrf_token = Some(token);
        }
        if let Ok(session) = std::env::var("MATCHCHAT_SESSION_ID") {
            self.session_id = Some(session);
        }
        if let Ok(ms) = std::env::var("MATCHCHAT_POLL_INTERVAL_MS") {
            self.poll_interval_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("MATCHCHAT_POLL_INTERVAL_MS is not an integer: {}", ms))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.match_id.is_none() {
            anyhow::bail!("match_id is required in matchchat.yaml or MATCHCHAT_MATCH_ID env var");
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must be an http or https URL: {}", self.base_url);
        }
        Ok(())
    }

    /// The validated match id. Zero only for an unvalidated default config.
    pub fn match_id(&self) -> MatchId {
        self.match_id.unwrap_or_default()
    }

    /// Initial cursor; absent or invalid seeds start at 0.
    pub fn initial_cursor(&self) -> MessageId {
        parse_cursor(self.last_message_id.as_deref())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            match_id: None,
            last_message_id: None,
            csrf_token: None,
            session_id: None,
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "match_id: 7").unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.match_id(), 7);
        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.initial_cursor(), 0);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_load_config_custom_values() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            "base_url: https://chat.example.org\nmatch_id: 3\nlast_message_id: \"41\"\ncsrf_token: tok\npoll_interval_ms: 250\nrequest_timeout_secs: 10"
        )
        .unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.base_url, "https://chat.example.org");
        assert_eq!(config.initial_cursor(), 41);
        assert_eq!(config.csrf_token.as_deref(), Some("tok"));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_invalid_cursor_seed_falls_back_to_zero() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "match_id: 3\nlast_message_id: \"none\"").unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.initial_cursor(), 0);
    }

    #[test]
    fn test_missing_match_id_fails() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "base_url: http://localhost:8000").unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }

    #[test]
    fn test_zero_poll_interval_fails() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "match_id: 3\npoll_interval_ms: 0").unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }

    #[test]
    fn test_bad_base_url_fails() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "match_id: 3\nbase_url: localhost:8000").unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }
}
