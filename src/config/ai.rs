//! Assistants API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::handlers::bridge::BridgeSettings;

/// Upstream assistants API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Model for endpoints that don't name one
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (non-streaming calls)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Delay between run status checks in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Longest wait for one run in seconds
    #[serde(default = "default_run_deadline")]
    pub run_deadline_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn run_deadline(&self) -> Duration {
        Duration::from_secs(self.run_deadline_secs)
    }

    /// Settings the bridge handler runs with.
    pub fn bridge_settings(&self) -> BridgeSettings {
        BridgeSettings {
            default_model: self.model.clone(),
            poll_interval: self.poll_interval(),
            run_deadline: self.run_deadline(),
        }
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.run_deadline() <= self.poll_interval() {
            return Err(ValidationError::InvalidRunDeadline);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            poll_interval_ms: default_poll_interval(),
            run_deadline_secs: default_run_deadline(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_run_deadline() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AiConfig {
        AiConfig {
            openai_api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.run_deadline(), Duration::from_secs(120));
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 30,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_bridge_settings_follow_config() {
        let config = AiConfig {
            model: "gpt-4o-mini".to_string(),
            poll_interval_ms: 250,
            run_deadline_secs: 30,
            ..configured()
        };
        let settings = config.bridge_settings();
        assert_eq!(settings.default_model, "gpt-4o-mini");
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.run_deadline, Duration::from_secs(30));
    }

    #[test]
    fn test_validation_missing_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        );

        let blank = AiConfig {
            openai_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_validation_bad_base_url() {
        let config = AiConfig {
            base_url: "api.openai.com".to_string(),
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_validation_zero_poll_interval() {
        let config = AiConfig {
            poll_interval_ms: 0,
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPollInterval));
    }

    #[test]
    fn test_validation_deadline_shorter_than_interval() {
        let config = AiConfig {
            poll_interval_ms: 5000,
            run_deadline_secs: 2,
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRunDeadline));
    }
}
