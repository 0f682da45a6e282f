//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use rand::RngCore;

/// Name of the cookie carrying the refresh token
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Credentials for the bootstrap superadmin account
#[derive(Clone)]
pub struct SuperAdminSeed {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SuperAdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperAdminSeed")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub access_secret: Vec<u8>,
    /// HMAC secret for refresh tokens (must differ from the access secret)
    pub refresh_secret: Vec<u8>,
    /// Access token lifetime (1 day)
    pub access_ttl: Duration,
    /// Refresh token lifetime, also the cookie Max-Age (30 days)
    pub refresh_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Superadmin created at startup when none exists
    pub super_admin: Option<SuperAdminSeed>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: Vec::new(),
            refresh_secret: Vec::new(),
            access_ttl: Duration::from_secs(24 * 3600),
            refresh_ttl: Duration::from_secs(30 * 24 * 3600),
            cookie_secure: true,
            password_pepper: None,
            super_admin: None,
        }
    }
}

impl AuthConfig {
    /// Create config with random token secrets
    pub fn with_random_secrets() -> Self {
        Self {
            access_secret: random_secret(),
            refresh_secret: random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Attributes of the refresh token cookie
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig::http_only(
            REFRESH_COOKIE_NAME,
            self.refresh_ttl.as_secs(),
            self.cookie_secure,
        )
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("super_admin", &self.super_admin)
            .finish()
    }
}

fn random_secret() -> Vec<u8> {
    let mut secret = vec![0u8; 32];
    rand::rng().fill_bytes(&mut secret);
    secret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl.as_secs(), 86_400);
        assert_eq!(config.refresh_ttl.as_secs(), 2_592_000);
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_development_secrets_differ() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert_eq!(config.access_secret.len(), 32);
        assert_ne!(config.access_secret, config.refresh_secret);
    }

    #[test]
    fn test_refresh_cookie() {
        let cookie = AuthConfig::default().refresh_cookie();
        assert_eq!(cookie.name, "refreshToken");
        assert_eq!(cookie.max_age_secs, Some(2_592_000));
        assert!(cookie.http_only);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            super_admin: Some(SuperAdminSeed {
                email: "root@example.com".to_string(),
                password: "hunter22".to_string(),
            }),
            ..AuthConfig::development()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("root@example.com"));
    }
}
