use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment once at start-up
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_sql_log: bool,
    pub log_level: String,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = read("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;
        let port = parse(read("APP_PORT"), "APP_PORT", 3000)?;
        let database_max_connections =
            parse(read("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 10)?;
        let database_sql_log = flag(read("DATABASE_SQL_LOG"), "DATABASE_SQL_LOG", false)?;
        let run_migrations = flag(read("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?;

        Ok(Self {
            host: read("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            database_url,
            database_max_connections,
            database_sql_log,
            log_level: read("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
            run_migrations,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "APP_HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn parse<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn flag(value: Option<String>, name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            name,
            value: value.unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/tenders")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_max_connections, 10);
        assert!(!config.database_sql_log);
        assert!(config.run_migrations);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_database_url_required() {
        assert_eq!(load(&[]), Err(ConfigError::MissingDatabaseUrl));
        assert_eq!(
            load(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::MissingDatabaseUrl)
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("DATABASE_URL", "x"), ("APP_PORT", "http")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "APP_PORT",
                value: "http".into()
            }
        );

        let err = load(&[("DATABASE_URL", "x"), ("RUN_MIGRATIONS", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "RUN_MIGRATIONS", .. }));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "x"),
            ("APP_HOST", "localhost"),
            ("APP_PORT", "8080"),
            ("DATABASE_SQL_LOG", "TRUE"),
            ("RUN_MIGRATIONS", "off"),
        ])
        .unwrap();
        assert!(config.database_sql_log);
        assert!(!config.run_migrations);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }
}
