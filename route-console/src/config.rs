//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::CatalogClientConfig;

/// Errors reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be true or false, got {value}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be a whole number of seconds, got {value}")]
    InvalidSecs { var: &'static str, value: String },
}

/// Everything `main` needs to start the console.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// `None` when either the base URL or the API key is unset
    pub catalog: Option<CatalogClientConfig>,
    pub static_dir: PathBuf,
    pub location_cache_path: PathBuf,
    pub location_refresh: Duration,
    pub strict_time_format: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            catalog: None,
            static_dir: PathBuf::from("static"),
            location_cache_path: PathBuf::from("locations_cache.json"),
            location_refresh: Duration::from_secs(24 * 60 * 60),
            strict_time_format: false,
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("ROUTE_CONSOLE_ADDR") {
            config.addr = value.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                var: "ROUTE_CONSOLE_ADDR",
                value,
            })?;
        }

        if let (Some(base_url), Some(api_key)) = (get("CATALOG_BASE_URL"), get("CATALOG_API_KEY")) {
            config.catalog = Some(CatalogClientConfig::new(api_key, base_url));
        }

        if let Some(dir) = get("ROUTE_CONSOLE_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        if let Some(path) = get("LOCATION_CACHE_PATH") {
            config.location_cache_path = PathBuf::from(path);
        }

        if let Some(value) = get("LOCATION_REFRESH_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidSecs {
                var: "LOCATION_REFRESH_SECS",
                value: value.clone(),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidSecs {
                    var: "LOCATION_REFRESH_SECS",
                    value,
                });
            }
            config.location_refresh = Duration::from_secs(secs);
        }

        if let Some(value) = get("ROUTE_CONSOLE_STRICT_TIMES") {
            config.strict_time_format = parse_bool("ROUTE_CONSOLE_STRICT_TIMES", value)?;
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert!(config.catalog.is_none());
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.location_cache_path, PathBuf::from("locations_cache.json"));
        assert!(!config.strict_time_format);
    }

    #[test]
    fn catalog_needs_both_url_and_key() {
        let only_url = from_pairs(&[("CATALOG_BASE_URL", "http://catalog")]).unwrap();
        assert!(only_url.catalog.is_none());

        let both = from_pairs(&[
            ("CATALOG_BASE_URL", "http://catalog"),
            ("CATALOG_API_KEY", "secret"),
        ])
        .unwrap();
        let catalog = both.catalog.unwrap();
        assert_eq!(catalog.base_url, "http://catalog");
        assert_eq!(catalog.api_key, "secret");
    }

    #[test]
    fn parses_overrides() {
        let config = from_pairs(&[
            ("ROUTE_CONSOLE_ADDR", "0.0.0.0:8080"),
            ("ROUTE_CONSOLE_STRICT_TIMES", "yes"),
            ("LOCATION_REFRESH_SECS", "60"),
            ("LOCATION_CACHE_PATH", "/tmp/loc.json"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert!(config.strict_time_format);
        assert_eq!(config.location_refresh, Duration::from_secs(60));
        assert_eq!(config.location_cache_path, PathBuf::from("/tmp/loc.json"));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = from_pairs(&[("ROUTE_CONSOLE_ADDR", "  ")]).unwrap();
        assert_eq!(config.addr.port(), 3000);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            from_pairs(&[("ROUTE_CONSOLE_ADDR", "nope")]),
            Err(ConfigError::InvalidAddr { .. })
        ));
        assert!(matches!(
            from_pairs(&[("ROUTE_CONSOLE_STRICT_TIMES", "maybe")]),
            Err(ConfigError::InvalidBool { .. })
        ));
        assert!(matches!(
            from_pairs(&[("LOCATION_REFRESH_SECS", "0")]),
            Err(ConfigError::InvalidSecs { .. })
        ));
    }
}
