//! Reporting configuration, loaded from the environment with defaults.

use std::time::Duration;

use thiserror::Error;

pub const DB_PATH_KEY: &str = "DB_PATH";
pub const TOP_N_KEY: &str = "REPORT_TOP_N";
pub const TIMEOUT_KEY: &str = "REPORT_TIMEOUT_SECS";

pub const DEFAULT_DB_PATH: &str = "northwind.db";
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} (expected a positive integer)")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingConfig {
    /// Path to the SQLite Northwind database file.
    pub db_path: String,
    /// Row limit for the ranked reports (top customers/products/suppliers).
    pub top_n: usize,
    /// Upper bound on a single computation; `None` means no limit.
    pub timeout: Option<Duration>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            top_n: DEFAULT_TOP_N,
            timeout: None,
        }
    }
}

impl ReportingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = get(DB_PATH_KEY).unwrap_or_else(|| {
            tracing::debug!("{DB_PATH_KEY} not set; using {DEFAULT_DB_PATH}");
            DEFAULT_DB_PATH.to_string()
        });
        let top_n = match get(TOP_N_KEY) {
            Some(raw) => positive(TOP_N_KEY, &raw)? as usize,
            None => DEFAULT_TOP_N,
        };
        let timeout = get(TIMEOUT_KEY)
            .map(|raw| positive(TIMEOUT_KEY, &raw).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            db_path,
            top_n,
            timeout,
        })
    }

    /// Connection URL for the database file, opened read-only.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=ro", self.db_path)
    }
}

fn positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = ReportingConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ReportingConfig::default());
        assert_eq!(cfg.database_url(), "sqlite://northwind.db?mode=ro");
    }

    #[test]
    fn reads_every_key() {
        let cfg = ReportingConfig::from_lookup(lookup(&[
            ("DB_PATH", "/data/nw.db"),
            ("REPORT_TOP_N", " 5 "),
            ("REPORT_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_path, "/data/nw.db");
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = ReportingConfig::from_lookup(lookup(&[("DB_PATH", "  "), ("REPORT_TOP_N", "")]))
            .unwrap();
        assert_eq!(cfg.db_path, DEFAULT_DB_PATH);
        assert_eq!(cfg.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        let err = ReportingConfig::from_lookup(lookup(&[("REPORT_TOP_N", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "REPORT_TOP_N",
                value: "0".into()
            }
        );

        let err =
            ReportingConfig::from_lookup(lookup(&[("REPORT_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "REPORT_TIMEOUT_SECS", .. }));
    }
}
