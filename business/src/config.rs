use std::time::Duration;

use anyhow::{Context as _, bail};
use roster_states::State;
use serde::Deserialize;
use ustr::Ustr;

use crate::Environment;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Retry schedule for the users list query.
///
/// A failed attempt `n` (zero based) waits `base_delay * 2^n`, capped at `max_delay`, before
/// the next one. After `max_retries` retries the query settles into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    /// Invalidate the users list when the window regains focus.
    pub refetch_on_focus: bool,
    /// Web front end that serves `/users/{id}` detail pages. Navigation is only recorded
    /// when unset.
    pub app_base_url: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
            ..Self::default()
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{}/api", self.api_base_url.trim_end_matches('/')))
        }
    }

    /// Absolute detail-page URL for a navigation `path`, if a front end is configured.
    pub fn detail_url(&self, path: &str) -> Option<String> {
        self.app_base_url
            .as_deref()
            .map(|base| format!("{}{path}", base.trim_end_matches('/')))
    }

    /// Reads `ROSTER_*` variables from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw = RawConfig::from_vars(vars)?;
        let defaults = Self::default();

        let timeout_secs = raw.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("ROSTER_REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        let mut retry = defaults.retry;
        if let Some(max_retries) = raw.retry_max {
            retry.max_retries = max_retries;
        }
        if let Some(base_ms) = raw.retry_base_ms {
            retry.base_delay = Duration::from_millis(base_ms);
        }

        Ok(Self {
            api_base_url: raw.api_base_url.unwrap_or(defaults.api_base_url),
            request_timeout: Duration::from_secs(timeout_secs),
            retry,
            refetch_on_focus: raw.refetch_on_focus.unwrap_or(defaults.refetch_on_focus),
            app_base_url: raw.app_base_url.filter(|url| !url.is_empty()),
        })
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            refetch_on_focus: true,
            app_base_url: None,
        }
    }
}

impl State for BusinessConfig {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RuntimeEnv {
    Production,
    Development,
}

/// `ROSTER_*` variables with the prefix stripped.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfig {
    pub(crate) api_base_url: Option<String>,
    pub(crate) app_base_url: Option<String>,
    pub(crate) request_timeout_secs: Option<u64>,
    pub(crate) retry_max: Option<u32>,
    pub(crate) retry_base_ms: Option<u64>,
    pub(crate) refetch_on_focus: Option<bool>,
    pub(crate) env: Option<RuntimeEnv>,
    pub(crate) touch: Option<bool>,
}

impl RawConfig {
    pub(crate) fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix("ROSTER_")
                    .map(|stripped| (stripped.to_owned(), value))
            })
            .collect();

        serde_env::from_iter(scoped).context("Failed to parse ROSTER_* environment variables")
    }
}

/// Loads the config and the runtime environment from the same variable set.
pub fn load_from_env() -> anyhow::Result<(BusinessConfig, Environment)> {
    let vars: Vec<(String, String)> = std::env::vars().collect();
    let config = BusinessConfig::from_vars(vars.clone())?;
    let environment = Environment::from_vars(vars)?;
    Ok((config, environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn api_url_appends_api_segment() {
        let config = BusinessConfig::new("http://127.0.0.1:3000".to_owned());
        assert_eq!(config.api_url(), Ustr::from("http://127.0.0.1:3000/api"));

        let trailing = BusinessConfig::new("http://127.0.0.1:3000/".to_owned());
        assert_eq!(trailing.api_url(), Ustr::from("http://127.0.0.1:3000/api"));

        let relative = BusinessConfig::new(String::new());
        assert_eq!(relative.api_url(), Ustr::from("/api"));
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = BusinessConfig::from_vars(vars(&[("HOME", "/root")])).unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.refetch_on_focus);
        assert_eq!(config.app_base_url, None);
    }

    #[test]
    fn detail_pages_use_front_end_host_not_api_host() {
        let config = BusinessConfig::from_vars(vars(&[
            ("ROSTER_API_BASE_URL", "https://api.example.com"),
            ("ROSTER_APP_BASE_URL", "https://admin.example.com/"),
        ]))
        .unwrap();
        assert_eq!(
            config.detail_url("/users/u1").as_deref(),
            Some("https://admin.example.com/users/u1")
        );

        let without_front_end =
            BusinessConfig::from_vars(vars(&[("ROSTER_API_BASE_URL", "https://api.example.com")]))
                .unwrap();
        assert_eq!(without_front_end.detail_url("/users/u1"), None);
    }

    #[test]
    fn variables_override_defaults() {
        let config = BusinessConfig::from_vars(vars(&[
            ("ROSTER_API_BASE_URL", "https://admin.example.com"),
            ("ROSTER_REQUEST_TIMEOUT_SECS", "5"),
            ("ROSTER_RETRY_MAX", "1"),
            ("ROSTER_RETRY_BASE_MS", "250"),
            ("ROSTER_REFETCH_ON_FOCUS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://admin.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.base_delay, Duration::from_millis(250));
        assert!(!config.refetch_on_focus);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = BusinessConfig::from_vars(vars(&[("ROSTER_REQUEST_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("ROSTER_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn malformed_number_is_an_error() {
        assert!(BusinessConfig::from_vars(vars(&[("ROSTER_RETRY_MAX", "many")])).is_err());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(5), Duration::from_secs(30));
        assert_eq!(policy.delay_for(40), Duration::from_secs(30));
        assert_eq!(policy.total_attempts(), 4);
    }
}
