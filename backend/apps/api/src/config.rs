//! Server Configuration
//!
//! Everything read from the environment at startup. `.env` is loaded by
//! `main` before this runs.

use anyhow::{Context, bail};
use auth::{AuthConfig, SuperAdminSeed};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
        let database_max_connections =
            parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let server_addr = parse_or(
            "SERVER_ADDR",
            SocketAddr::from_str(DEFAULT_SERVER_ADDR).context("default server address")?,
        )?;
        let frontend_origins = optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            database_max_connections,
            server_addr,
            frontend_origins,
            auth: auth_config()?,
        })
    }
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    };

    match (optional("JWT_ACCESS_SECRET"), optional("JWT_REFRESH_SECRET")) {
        (Some(access), Some(refresh)) => {
            if access == refresh {
                bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ");
            }
            config.access_secret = access.into_bytes();
            config.refresh_secret = refresh.into_bytes();
        }
        (None, None) if cfg!(debug_assertions) => {
            tracing::warn!("JWT secrets not set; using random secrets for this run");
        }
        _ => bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must both be set"),
    }

    config.access_ttl = Duration::from_secs(parse_or(
        "JWT_ACCESS_EXPIRES_SECS",
        config.access_ttl.as_secs(),
    )?);
    config.refresh_ttl = Duration::from_secs(parse_or(
        "JWT_REFRESH_EXPIRES_SECS",
        config.refresh_ttl.as_secs(),
    )?);
    config.cookie_secure = parse_or("COOKIE_SECURE", config.cookie_secure)?;
    config.password_pepper = optional("PASSWORD_PEPPER").map(String::into_bytes);

    config.super_admin = match (optional("SUPER_ADMIN_EMAIL"), optional("SUPER_ADMIN_PASSWORD")) {
        (Some(email), Some(password)) => Some(SuperAdminSeed { email, password }),
        (None, None) => None,
        _ => {
            tracing::warn!(
                "Only one of SUPER_ADMIN_EMAIL / SUPER_ADMIN_PASSWORD is set; skipping seed"
            );
            None
        }
    };

    Ok(config)
}

/// Non-empty variable, if set
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
