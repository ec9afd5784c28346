use axum_extra::extract::cookie::Key;
use figment::{Figment, providers::Env};
use serde::Deserialize;
use std::fmt;

use crate::error::PorticoError;

/// Minimum length of `SECRET`; the cookie key is derived from it.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime (30 days).
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 3600;

const ENV_KEYS: &[&str] = &[
    "secret",
    "database_url",
    "redis_port",
    "listen_addr",
    "loglevel",
    "insecure_cookie",
    "session_ttl_secs",
    "session_sweep_secs",
];

/// Runtime configuration, read from the process environment (and `.env`).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub secret: Option<String>,
    pub database_url: String,
    /// Cache port from the environment; read and logged, nothing connects to it.
    pub redis_port: u16,
    pub listen_addr: String,
    pub loglevel: String,
    /// Drop the `Secure` attribute from cookies (plain-HTTP deployments behind TLS termination).
    pub insecure_cookie: bool,
    pub session_ttl_secs: u64,
    pub session_sweep_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: None,
            database_url: "sqlite:portico.db".to_string(),
            redis_port: 6379,
            listen_addr: "0.0.0.0:3000".to_string(),
            loglevel: "info".to_string(),
            insecure_cookie: false,
            session_ttl_secs: 3600,
            session_sweep_secs: 300,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("database_url", &self.database_url)
            .field("redis_port", &self.redis_port)
            .field("listen_addr", &self.listen_addr)
            .field("loglevel", &self.loglevel)
            .field("insecure_cookie", &self.insecure_cookie)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("session_sweep_secs", &self.session_sweep_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, PorticoError> {
        let cfg: Config = Figment::new().merge(Env::raw().only(ENV_KEYS)).extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), PorticoError> {
        if let Some(secret) = self.secret.as_deref()
            && secret.len() < MIN_SECRET_LEN
        {
            return Err(PorticoError::InvalidConfig(format!(
                "SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.session_ttl_secs == 0 || self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(PorticoError::InvalidConfig(format!(
                "SESSION_TTL_SECS must be between 1 and {MAX_SESSION_TTL_SECS}"
            )));
        }
        if self.session_sweep_secs == 0 {
            return Err(PorticoError::InvalidConfig(
                "SESSION_SWEEP_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Cookie encryption key. Without a configured secret a random key is
    /// generated, so issued cookies do not survive a restart.
    pub fn cookie_key(&self) -> Result<Key, PorticoError> {
        self.validate()?;
        match self.secret.as_deref() {
            Some(secret) => Ok(Key::derive_from(secret.as_bytes())),
            None => Ok(Key::generate()),
        }
    }

    /// Capped at [`MAX_SESSION_TTL_SECS`] even when `validate` was bypassed.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_sweep_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.database_url, "sqlite:portico.db");
        assert_eq!(cfg.session_ttl(), chrono::Duration::hours(1));
        assert_eq!(cfg.redis_port, 6379);
        assert!(!cfg.insecure_cookie);
        assert!(cfg.secret.is_none());
        assert!(cfg.cookie_key().is_ok());
    }

    #[test]
    fn environment_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite:/tmp/other.db");
            jail.set_env("REDIS_PORT", "6380");
            jail.set_env("INSECURE_COOKIE", "true");
            jail.set_env("SESSION_TTL_SECS", "60");
            jail.set_env("SECRET", "s".repeat(40));
            let cfg = Config::from_env().expect("config should load");
            assert_eq!(cfg.database_url, "sqlite:/tmp/other.db");
            assert_eq!(cfg.redis_port, 6380);
            assert!(cfg.insecure_cookie);
            assert_eq!(cfg.session_ttl(), chrono::Duration::seconds(60));
            assert!(cfg.cookie_key().is_ok());
            Ok(())
        });
    }

    #[test]
    fn short_secret_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("SECRET", "secret-key");
            assert!(matches!(
                Config::from_env(),
                Err(PorticoError::InvalidConfig(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn oversized_ttl_is_rejected_without_panicking() {
        Jail::expect_with(|jail| {
            jail.set_env("SESSION_TTL_SECS", "1000000000000");
            assert!(matches!(
                Config::from_env(),
                Err(PorticoError::InvalidConfig(_))
            ));
            Ok(())
        });

        let cfg = Config {
            session_ttl_secs: u64::MAX,
            ..Config::default()
        };
        assert!(cfg.cookie_key().is_err());
        assert_eq!(
            cfg.session_ttl(),
            chrono::Duration::seconds(MAX_SESSION_TTL_SECS as i64)
        );
    }

    #[test]
    fn debug_output_redacts_secret() {
        let cfg = Config {
            secret: Some("x".repeat(48)),
            ..Config::default()
        };
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&"x".repeat(48)));
    }

    #[test]
    fn same_secret_derives_same_key() {
        let cfg = Config {
            secret: Some("k".repeat(32)),
            ..Config::default()
        };
        let a = cfg.cookie_key().unwrap();
        let b = cfg.cookie_key().unwrap();
        assert_eq!(a.master(), b.master());
    }
}
