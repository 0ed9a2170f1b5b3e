//! Grant configuration.
//!
//! Lifetimes are written as human-readable durations.
//!
//! # Example (TOML)
//!
//! ```toml
//! [grant]
//! authorization_code_lifetime = "10m"
//! context_lifetime = "10m"
//! access_token_lifetime = "1h"
//! refresh_token_lifetime = "90d"
//! require_pkce = false
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::error::AuthError;

/// Minimum number of random bytes in an issued code or token (128 bits).
pub const MIN_TOKEN_BYTES: usize = 16;

/// Authorization code grant configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GrantConfig {
    /// Authorization code lifetime. Codes should be short-lived.
    #[serde(with = "humantime_serde")]
    pub authorization_code_lifetime: Duration,

    /// Lifetime of the context saved alongside a code.
    #[serde(with = "humantime_serde")]
    pub context_lifetime: Duration,

    /// Access token lifetime, reported as `expires_in`.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,

    /// Random bytes per issued code and token.
    pub token_bytes: usize,

    /// Reject authorization requests that carry no PKCE challenge.
    pub require_pkce: bool,
}

impl Default for GrantConfig {
    fn default() -> Self {
        Self {
            authorization_code_lifetime: Duration::from_secs(600), // 10 minutes
            context_lifetime: Duration::from_secs(600),
            access_token_lifetime: Duration::from_secs(3600), // 1 hour
            refresh_token_lifetime: Duration::from_secs(90 * 24 * 3600), // 90 days
            token_bytes: 32,
            require_pkce: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl GrantConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - Any lifetime is zero, or so long its expiry cannot be represented
    /// - `token_bytes` is below [`MIN_TOKEN_BYTES`]
    /// - The context outlives nothing the code can still redeem
    ///   (`context_lifetime < authorization_code_lifetime`)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lifetimes = [
            ("authorization_code_lifetime", self.authorization_code_lifetime),
            ("context_lifetime", self.context_lifetime),
            ("access_token_lifetime", self.access_token_lifetime),
            ("refresh_token_lifetime", self.refresh_token_lifetime),
        ];
        for (name, lifetime) in lifetimes {
            if lifetime.is_zero() {
                return Err(ConfigError::InvalidValue(format!("{} must be > 0", name)));
            }
            if OffsetDateTime::now_utc()
                .checked_add(to_time_duration(lifetime))
                .is_none()
            {
                return Err(ConfigError::InvalidValue(format!(
                    "{} ends past the representable date range",
                    name
                )));
            }
        }

        if self.token_bytes < MIN_TOKEN_BYTES {
            return Err(ConfigError::InvalidValue(format!(
                "token_bytes must be at least {}, got {}",
                MIN_TOKEN_BYTES, self.token_bytes
            )));
        }

        if self.context_lifetime < self.authorization_code_lifetime {
            return Err(ConfigError::InvalidValue(
                "context_lifetime must not be shorter than authorization_code_lifetime"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Code lifetime as a `time::Duration` for timestamp arithmetic.
    #[must_use]
    pub fn code_lifetime(&self) -> time::Duration {
        to_time_duration(self.authorization_code_lifetime)
    }

    /// Context lifetime as a `time::Duration` for timestamp arithmetic.
    #[must_use]
    pub fn context_lifetime(&self) -> time::Duration {
        to_time_duration(self.context_lifetime)
    }
}

/// Returns `start + lifetime`.
///
/// # Errors
///
/// Returns `Configuration` if the result falls outside the representable
/// date range.
pub fn expiry_after(start: OffsetDateTime, lifetime: time::Duration) -> AuthResult<OffsetDateTime> {
    start.checked_add(lifetime).ok_or_else(|| {
        AuthError::configuration(format!(
            "Lifetime of {}s ends past the representable date range",
            lifetime.whole_seconds()
        ))
    })
}

fn to_time_duration(duration: Duration) -> time::Duration {
    time::Duration::try_from(duration).unwrap_or(time::Duration::MAX)
}
