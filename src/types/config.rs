//! Bot configuration, loaded from a YAML file
//!
//! ```yaml
//! instance_url: https://botsin.space
//! access_token: abc123
//! lexicon_path: /etc/father/lexicon.tsv
//! policy:
//!   reply_probability: 0.1
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::{MAX_STATUS_CHARS, POLL_INTERVAL_SECS, RATE_LIMIT_BACKOFF_SECS, RECONCILE_EVERY, REPLY_PROBABILITY};

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Base URL of the Mastodon-compatible instance
    pub instance_url: String,
    /// Bearer token of the bot account
    pub access_token: String,
    /// Word list used by the reply compositor
    pub lexicon_path: PathBuf,
    /// Scheduling and reply policy
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Bind address of the status endpoint, off when absent
    #[serde(default)]
    pub status_addr: Option<String>,
}

/// Policy knobs, all defaulting to the crate constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Reconcile every N iterations
    pub reconcile_every: u32,
    /// Sleep between iterations
    pub poll_interval_secs: u64,
    /// Extra sleep after a rate-limit or transport error
    pub rate_limit_backoff_secs: u64,
    /// Bernoulli success probability for eligible posts
    pub reply_probability: f64,
    /// Status length ceiling, in characters
    pub max_status_chars: usize,
    /// Skip reconciliation when followers come back empty but we follow people
    pub guard_empty_followers: bool,
    /// Log actions instead of sending them
    pub dry_run: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            reconcile_every: RECONCILE_EVERY,
            poll_interval_secs: POLL_INTERVAL_SECS,
            rate_limit_backoff_secs: RATE_LIMIT_BACKOFF_SECS,
            reply_probability: REPLY_PROBABILITY,
            max_status_chars: MAX_STATUS_CHARS,
            guard_empty_followers: true,
            dry_run: false,
        }
    }
}

impl PolicyConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }

    /// Reject values the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.reconcile_every == 0 {
            return Err(Error::Config("policy.reconcile_every must be at least 1".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(Error::Config("policy.poll_interval_secs must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.reply_probability) {
            return Err(Error::Config(format!(
                "policy.reply_probability must be within [0, 1], got {}",
                self.reply_probability
            )));
        }
        if self.max_status_chars == 0 {
            return Err(Error::Config("policy.max_status_chars must be at least 1".into()));
        }
        Ok(())
    }
}

impl BotConfig {
    /// Parse from YAML text and validate
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: BotConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.instance_url.trim().is_empty() {
            return Err(Error::Config("instance_url is empty".into()));
        }
        if !self.instance_url.starts_with("http://") && !self.instance_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "instance_url must start with http:// or https://, got {}",
                self.instance_url
            )));
        }
        if self.access_token.trim().is_empty() {
            return Err(Error::Config("access_token is empty".into()));
        }
        self.policy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = BotConfig::from_yaml(
            "instance_url: https://example.social\naccess_token: t0k3n\nlexicon_path: words.tsv\n",
        )
        .unwrap();
        assert_eq!(config.policy, PolicyConfig::default());
        assert_eq!(config.policy.reconcile_every, 48);
        assert!(config.status_addr.is_none());
    }

    #[test]
    fn test_partial_policy_override() {
        let config = BotConfig::from_yaml(
            "instance_url: https://example.social\n\
             access_token: t0k3n\n\
             lexicon_path: words.tsv\n\
             policy:\n  reply_probability: 1.0\n  dry_run: true\n",
        )
        .unwrap();
        assert_eq!(config.policy.reply_probability, 1.0);
        assert!(config.policy.dry_run);
        assert_eq!(config.policy.poll_interval_secs, POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = BotConfig::from_yaml(
            "instance_url: https://example.social\n\
             access_token: t0k3n\n\
             lexicon_path: words.tsv\n\
             policy:\n  reply_probability: 1.5\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_missing_token() {
        let err = BotConfig::from_yaml("instance_url: https://example.social\nlexicon_path: w\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_rejects_zero_period() {
        let policy = PolicyConfig {
            reconcile_every: 0,
            ..PolicyConfig::default()
        };
        assert!(policy.validate().is_err());
    }
}
