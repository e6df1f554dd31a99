//! Application Configuration
//!
//! Token lifetimes, cookie attributes, and the access-token signing secret.

use chrono::Duration;
use platform::cookie::{CookieConfig, SameSite};
use thiserror::Error;

/// Minimum length for the access-token signing secret
pub const MIN_SECRET_BYTES: usize = 16;

/// Well-known development placeholder; never valid in production
const PLACEHOLDER_SECRET: &str = "change-me-in-production";

pub const ACCESS_COOKIE_NAME: &str = "access_token";
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";
pub const CSRF_COOKIE_NAME: &str = "csrf_token";

/// Configuration error variants
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOKEN_SECRET is not set")]
    MissingSecret,

    #[error("TOKEN_SECRET must be at least {MIN_SECRET_BYTES} bytes")]
    SecretTooShort,

    #[error("TOKEN_SECRET is still the placeholder value")]
    PlaceholderSecret,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing access tokens
    pub token_secret: Vec<u8>,
    /// Access token TTL (1 hour)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (7 days)
    pub refresh_token_ttl: Duration,
    /// CSRF token TTL (4 hours)
    pub csrf_token_ttl: Duration,
    /// Whether to require Secure cookies
    pub cookie_secure: bool,
    /// Explicit cookie domain; host-only cookies when unset
    pub cookie_domain: Option<String>,
    /// Whether the process runs with production hardening
    pub production: bool,
}

impl AuthConfig {
    /// Build configuration from `TOKEN_SECRET` and `APP_ENV`.
    ///
    /// In production a missing, short, or placeholder secret is a startup
    /// error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let secret = std::env::var("TOKEN_SECRET").ok();

        let token_secret = match secret {
            Some(s) if s == PLACEHOLDER_SECRET => {
                if production {
                    return Err(ConfigError::PlaceholderSecret);
                }
                tracing::warn!("TOKEN_SECRET is the placeholder value; fine for development only");
                s.into_bytes()
            }
            Some(s) if s.len() < MIN_SECRET_BYTES => {
                if production {
                    return Err(ConfigError::SecretTooShort);
                }
                tracing::warn!("TOKEN_SECRET is shorter than {MIN_SECRET_BYTES} bytes");
                s.into_bytes()
            }
            Some(s) => s.into_bytes(),
            None => {
                if production {
                    return Err(ConfigError::MissingSecret);
                }
                tracing::warn!("TOKEN_SECRET not set; generating an ephemeral development secret");
                platform::crypto::random_bytes(32)
            }
        };

        let cookie_domain = std::env::var("COOKIE_DOMAIN")
            .ok()
            .filter(|d| !d.trim().is_empty());

        Ok(Self {
            cookie_secure: production,
            cookie_domain,
            production,
            ..Self::defaults_with_secret(token_secret)
        })
    }

    /// Create config with a random secret (for development and tests)
    pub fn development() -> Self {
        Self::defaults_with_secret(platform::crypto::random_bytes(32))
    }

    fn defaults_with_secret(token_secret: Vec<u8>) -> Self {
        Self {
            token_secret,
            access_token_ttl: Duration::hours(1),
            refresh_token_ttl: Duration::days(7),
            csrf_token_ttl: Duration::hours(4),
            cookie_secure: false,
            cookie_domain: None,
            production: false,
        }
    }

    /// Access-token cookie: HttpOnly, SameSite=Lax, 1h
    pub fn access_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: ACCESS_COOKIE_NAME.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            domain: self.cookie_domain.clone(),
            max_age_secs: Some(self.access_token_ttl.num_seconds()),
        }
    }

    /// Refresh-token cookie: HttpOnly, SameSite=Lax, 7d
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: REFRESH_COOKIE_NAME.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            domain: self.cookie_domain.clone(),
            max_age_secs: Some(self.refresh_token_ttl.num_seconds()),
        }
    }

    /// CSRF cookie: readable by page scripts (NOT HttpOnly), SameSite=Strict, 4h
    pub fn csrf_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: CSRF_COOKIE_NAME.to_string(),
            secure: self.cookie_secure,
            http_only: false,
            same_site: SameSite::Strict,
            path: "/".to_string(),
            domain: self.cookie_domain.clone(),
            max_age_secs: Some(self.csrf_token_ttl.num_seconds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_attributes() {
        let config = AuthConfig::development();

        let access = config.access_cookie();
        assert!(access.http_only);
        assert_eq!(access.same_site, SameSite::Lax);
        assert_eq!(access.max_age_secs, Some(3600));

        let refresh = config.refresh_cookie();
        assert!(refresh.http_only);
        assert_eq!(refresh.max_age_secs, Some(7 * 24 * 3600));

        // The CSRF cookie must be readable by the page for double-submit
        let csrf = config.csrf_cookie();
        assert!(!csrf.http_only);
        assert_eq!(csrf.same_site, SameSite::Strict);
        assert_eq!(csrf.max_age_secs, Some(4 * 3600));
    }

    #[test]
    fn test_development_secret_length() {
        let config = AuthConfig::development();
        assert!(config.token_secret.len() >= MIN_SECRET_BYTES);
        assert!(!config.production);
        assert!(!config.cookie_secure);
    }
}
