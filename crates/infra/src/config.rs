//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `USERHUB_BIND_ADDR` | `0.0.0.0:8080` | listen address |
//! | `USE_PERSISTENT_STORES` | `false` | use Postgres instead of the in-memory store |
//! | `DATABASE_URL` | none | required when `USE_PERSISTENT_STORES=true` |
//! | `DATABASE_MAX_CONNECTIONS` | `5` | pool size |

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_var(
            "USERHUB_BIND_ADDR",
            lookup("USERHUB_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let use_persistent_stores = match lookup("USE_PERSISTENT_STORES") {
            Some(raw) => parse_var("USE_PERSISTENT_STORES", raw.to_lowercase())?,
            None => false,
        };

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => parse_var("DATABASE_MAX_CONNECTIONS", raw)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            bind_addr,
            use_persistent_stores,
            database_url,
            database_max_connections,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            use_persistent_stores: false,
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

fn parse_var<T>(var: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn persistent_stores_require_database_url() {
        let err = AppConfig::from_lookup(lookup(&[("USE_PERSISTENT_STORES", "true")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn reads_all_variables() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("USERHUB_BIND_ADDR", "127.0.0.1:9000"),
            ("USE_PERSISTENT_STORES", "TRUE"),
            ("DATABASE_URL", "postgres://localhost/users"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:9000");
        assert!(cfg.use_persistent_stores);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/users"));
        assert_eq!(cfg.database_max_connections, 12);
    }

    #[test]
    fn malformed_value_names_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "lots")])).unwrap_err();
        match err {
            ConfigError::Invalid { var, .. } => assert_eq!(var, "DATABASE_MAX_CONNECTIONS"),
            _ => panic!("Expected Invalid error"),
        }
    }
}
