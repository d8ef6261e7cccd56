use std::env;

use thiserror::Error;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Optional parts of the route table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Features {
    /// `POST /genres` and `PUT /genres/{id}`
    pub genres: bool,
    /// `GET /api-docs`
    pub docs: bool,
}

impl Features {
    pub fn all() -> Self {
        Features { genres: true, docs: true }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub pool_size: u32,
    pub features: Features,
}

fn parse_flag(key: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw {
        None => Ok(true),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}

impl Settings {
    /// Reads settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Settings, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
        where
            F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let pool_size = match lookup("DATABASE_POOL_SIZE") {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => raw.trim().parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::Invalid { key: "DATABASE_POOL_SIZE", value: raw })?,
        };

        let features = Features {
            genres: parse_flag("CATALOG_GENRE_ROUTES", lookup("CATALOG_GENRE_ROUTES"))?,
            docs: parse_flag("CATALOG_API_DOCS", lookup("CATALOG_API_DOCS"))?,
        };

        Ok(Settings { database_url, bind_address, pool_size, features })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_everything_but_the_database() {
        let s = settings(&[("DATABASE_URL", "postgres://localhost/filmes")]).unwrap();

        assert_eq!(s.database_url, "postgres://localhost/filmes");
        assert_eq!(s.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(s.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(s.features, Features::all());
    }

    #[test]
    fn requires_database_url() {
        assert_eq!(settings(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(settings(&[("DATABASE_URL", "")]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn reads_feature_flags() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/filmes"),
            ("CATALOG_GENRE_ROUTES", "No"),
            ("CATALOG_API_DOCS", "0"),
        ]).unwrap();

        assert_eq!(s.features, Features { genres: false, docs: false });
    }

    #[test]
    fn rejects_bad_values() {
        let pool = settings(&[("DATABASE_URL", "x"), ("DATABASE_POOL_SIZE", "0")]);
        assert_eq!(pool, Err(ConfigError::Invalid { key: "DATABASE_POOL_SIZE", value: "0".to_string() }));

        let flag = settings(&[("DATABASE_URL", "x"), ("CATALOG_API_DOCS", "talvez")]);
        assert_eq!(flag, Err(ConfigError::Invalid { key: "CATALOG_API_DOCS", value: "talvez".to_string() }));
    }
}
