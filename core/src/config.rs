//! Runtime configuration for service factories.
//!
//! | Variable              | Meaning                                | Default                 |
//! |-----------------------|----------------------------------------|-------------------------|
//! | `SERVICE_BASE_URL`    | base URL for the builtin registry      | `http://localhost:3000` |
//! | `SERVICE_TIMEOUT_MS`  | per-call deadline in milliseconds      | none                    |
//! | `SERVICE_AUTH_POLICY` | `ambient` or `declared`                | `ambient`               |

use std::time::Duration;

use crate::error::ServiceError;
use crate::headers::AuthPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

pub const ENV_BASE_URL: &str = "SERVICE_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "SERVICE_TIMEOUT_MS";
pub const ENV_AUTH_POLICY: &str = "SERVICE_AUTH_POLICY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub auth_policy: AuthPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            auth_policy: AuthPolicy::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup. Unset or blank
    /// keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = get(ENV_TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                ServiceError::Config(format!("{ENV_TIMEOUT_MS} must be milliseconds, got `{raw}`"))
            })?;
            config.timeout = Some(Duration::from_millis(millis));
        }
        if let Some(raw) = get(ENV_AUTH_POLICY) {
            config.auth_policy = raw.parse()?;
        }

        tracing::debug!(
            base_url = %config.base_url,
            timeout = ?config.timeout,
            auth_policy = ?config.auth_policy,
            "loaded service config"
        );
        Ok(config)
    }
}
