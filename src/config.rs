use std::env;
use std::time::Duration;

use log::Level;
use url::Url;

use crate::errors::ConfigError;

/// Which repository implementation backs the service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

/// Process-wide settings read once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    pub store: StoreKind,
    pub connection_string: String,
    pub database: String,
    pub max_connections: u32,
    pub port: u16,
    pub base_url: Url,
    pub store_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub log_level: Level,
    pub log_bodies: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source; blank values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
        };

        let store = match get("SHAKER_STORE", "postgres").trim() {
            "postgres" => StoreKind::Postgres,
            "memory" => StoreKind::Memory,
            other => return Err(ConfigError::UnknownStore(other.to_owned())),
        };

        let base_url = get("SHAKER_BASE_URL", "http://localhost:8080/");
        let base_url = Url::parse(&base_url).map_err(|source| ConfigError::InvalidUrl {
            name: "SHAKER_BASE_URL",
            source,
        })?;

        let log_level = get("SHAKER_LOG_LEVEL", "info");
        let log_level = log::parse_level(&log_level).ok_or(ConfigError::InvalidValue {
            name: "SHAKER_LOG_LEVEL",
            value: log_level.clone(),
        })?;

        Ok(Settings {
            store,
            connection_string: get("SHAKER_DB_CONNECTION_STRING", "postgres://localhost:5432"),
            database: get("SHAKER_DB_NAME", "fafadb"),
            max_connections: parse("SHAKER_DB_MAX_CONNECTIONS", get("SHAKER_DB_MAX_CONNECTIONS", "10"))?,
            port: parse("SHAKER_PORT", get("SHAKER_PORT", "8080"))?,
            base_url,
            store_timeout: Duration::from_secs(parse(
                "SHAKER_STORE_TIMEOUT_SECS",
                get("SHAKER_STORE_TIMEOUT_SECS", "10"),
            )?),
            allowed_origins: get(
                "SHAKER_ALLOWED_ORIGINS",
                "http://localhost:5173,http://127.0.0.1:5173",
            )
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(parse_origin)
            .collect::<Result<_, _>>()?,
            log_level,
            log_bodies: parse_flag("SHAKER_LOG_BODIES", get("SHAKER_LOG_BODIES", "0"))?,
        })
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

/// CORS origins are compared as `scheme://host[:port]`, without a path.
fn parse_origin(value: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        name: "SHAKER_ALLOWED_ORIGINS",
        value: value.to_owned(),
    };

    let origin = Url::parse(value).map_err(|_| invalid())?.origin();

    if origin.is_tuple() {
        Ok(origin.ascii_serialization())
    } else {
        Err(invalid())
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{Settings, StoreKind};
    use crate::errors::ConfigError;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<HashMap<_, _>>();

        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = settings(&[]).expect("default settings");

        assert_eq!(settings.store, StoreKind::Postgres);
        assert_eq!(settings.connection_string, "postgres://localhost:5432");
        assert_eq!(settings.database, "fafadb");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.store_timeout, Duration::from_secs(10));
        assert_eq!(
            settings.allowed_origins,
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
        assert!(!settings.log_bodies);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let settings = settings(&[("SHAKER_PORT", "  "), ("SHAKER_DB_NAME", "")]).expect("settings");

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.database, "fafadb");
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = settings(&[
            ("SHAKER_STORE", "memory"),
            ("SHAKER_PORT", "9090"),
            ("SHAKER_ALLOWED_ORIGINS", "https://shaker.example, "),
            ("SHAKER_LOG_BODIES", "1"),
            ("SHAKER_LOG_LEVEL", "debug"),
        ])
        .expect("settings");

        assert_eq!(settings.store, StoreKind::Memory);
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.allowed_origins, vec!["https://shaker.example"]);
        assert!(settings.log_bodies);
        assert_eq!(settings.log_level, log::Level::Debug);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            settings(&[("SHAKER_PORT", "eighty")]),
            Err(ConfigError::InvalidValue { name: "SHAKER_PORT", .. })
        ));
        assert!(matches!(
            settings(&[("SHAKER_STORE", "mongo")]),
            Err(ConfigError::UnknownStore(_))
        ));
        assert!(matches!(
            settings(&[("SHAKER_BASE_URL", "not a url")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            settings(&[("SHAKER_ALLOWED_ORIGINS", "localhost:5173/app")]),
            Err(ConfigError::InvalidValue { name: "SHAKER_ALLOWED_ORIGINS", .. })
        ));
    }

    #[test]
    fn origins_are_normalized() {
        let settings = settings(&[(
            "SHAKER_ALLOWED_ORIGINS",
            "https://Shaker.Example/, http://localhost:5173",
        )])
        .expect("settings");

        assert_eq!(
            settings.allowed_origins,
            vec!["https://shaker.example", "http://localhost:5173"]
        );
    }
}
