//! Call configuration.
//!
//! [`CallConfig`] is passed explicitly to the facade at construction time.
//! There is deliberately no ambient process-wide default: hidden cross-call
//! coupling makes tests non-hermetic.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on composed prompt size, in characters.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 8_000;

/// Default number of coercion-failure retries.
pub const DEFAULT_RETRY_BUDGET: u32 = 1;

/// Configuration for one facade instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallConfig {
    /// Provider identifier, e.g. `"openai"`. Informational for the
    /// transport; the pipeline does not interpret it.
    pub provider: String,

    /// Model name, e.g. `"gpt-4o"`.
    pub model_name: String,

    /// Request timeout, enforced by the transport.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "option_duration_serde",
        default
    )]
    pub timeout: Option<Duration>,

    /// How many times a coercion failure may be retried by re-issuing the
    /// same rendered request.
    pub retry_budget: u32,

    /// Maximum composed prompt size in characters. Exceeding it fails the
    /// call before any transport activity.
    pub max_prompt_chars: usize,

    /// Sampling temperature, forwarded to the transport.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub temperature: Option<f64>,
}

impl CallConfig {
    /// Create a config for the given provider and model with defaults for
    /// everything else.
    #[must_use]
    pub fn new(provider: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model_name: model_name.into(),
            timeout: None,
            retry_budget: DEFAULT_RETRY_BUDGET,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            temperature: None,
        }
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(self, secs: u64) -> Self {
        self.with_timeout(Duration::from_secs(secs))
    }

    /// Set the retry budget.
    #[must_use]
    pub fn with_retry_budget(mut self, budget: u32) -> Self {
        self.retry_budget = budget;
        self
    }

    /// Set the prompt size bound.
    #[must_use]
    pub fn with_max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = max;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Merge with another config, preferring values from `other`.
    ///
    /// Provider and model always come from `other`; optional knobs fall
    /// back to `self` when `other` leaves them unset.
    #[must_use]
    pub fn merge(&self, other: &CallConfig) -> CallConfig {
        CallConfig {
            provider: other.provider.clone(),
            model_name: other.model_name.clone(),
            timeout: other.timeout.or(self.timeout),
            retry_budget: other.retry_budget,
            max_prompt_chars: other.max_prompt_chars,
            temperature: other.temperature.or(self.temperature),
        }
    }
}

/// Serde helper for optional Duration, stored as fractional seconds.
mod option_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs_f64().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<f64> = Option::deserialize(deserializer)?;
        Ok(opt.map(Duration::from_secs_f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CallConfig::new("openai", "gpt-4o");
        assert_eq!(config.retry_budget, DEFAULT_RETRY_BUDGET);
        assert_eq!(config.max_prompt_chars, DEFAULT_MAX_PROMPT_CHARS);
        assert!(config.timeout.is_none());
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = CallConfig::new("anthropic", "claude-sonnet")
            .with_timeout_secs(30)
            .with_retry_budget(2)
            .with_max_prompt_chars(16_000)
            .with_temperature(0.2);

        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.retry_budget, 2);
        assert_eq!(config.max_prompt_chars, 16_000);
        assert_eq!(config.temperature, Some(0.2));
    }

    #[test]
    fn test_config_merge() {
        let base = CallConfig::new("openai", "gpt-4o")
            .with_timeout_secs(30)
            .with_temperature(0.7);
        let override_config = CallConfig::new("openai", "gpt-4o-mini");

        let merged = base.merge(&override_config);
        assert_eq!(merged.model_name, "gpt-4o-mini");
        assert_eq!(merged.timeout, Some(Duration::from_secs(30)));
        assert_eq!(merged.temperature, Some(0.7));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = CallConfig::new("openai", "gpt-4o").with_timeout_secs(10);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CallConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model_name, "gpt-4o");
        assert!(parsed.timeout.is_some());
    }
}
