use crate::domain::error::DomainError;
use chrono_tz::Tz;
use std::path::PathBuf;

pub const DEFAULT_DB: &str = "./leadboard.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_CACHE_FILE: &str = "./.leadboard-cache.json";
pub const DEFAULT_TZ: &str = "Europe/Berlin";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub bind: String,
    /// Remote stats endpoint; `None` means compute against the local database.
    pub api_url: Option<String>,
    pub cache_file: PathBuf,
    pub tz: Tz,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tz_name = get("LEADBOARD_TZ").unwrap_or_else(|| DEFAULT_TZ.into());
        let tz: Tz = tz_name
            .parse()
            .map_err(|_| DomainError::InvalidInput(format!("Unknown time zone: {tz_name}")))?;

        Ok(Self {
            db_path: get("LEADBOARD_DB").unwrap_or_else(|| DEFAULT_DB.into()),
            bind: get("LEADBOARD_BIND").unwrap_or_else(|| DEFAULT_BIND.into()),
            api_url: get("LEADBOARD_API_URL"),
            cache_file: get("LEADBOARD_CACHE_FILE")
                .unwrap_or_else(|| DEFAULT_CACHE_FILE.into())
                .into(),
            tz,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.db_path, DEFAULT_DB);
        assert_eq!(cfg.bind, DEFAULT_BIND);
        assert!(cfg.api_url.is_none());
        assert_eq!(cfg.tz, chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let env: HashMap<&str, &str> = [
            ("LEADBOARD_DB", "/tmp/crm.db"),
            ("LEADBOARD_API_URL", "  "),
            ("LEADBOARD_TZ", "America/New_York"),
        ]
        .into_iter()
        .collect();
        let cfg = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.db_path, "/tmp/crm.db");
        assert!(cfg.api_url.is_none());
        assert_eq!(cfg.tz, chrono_tz::America::New_York);
    }

    #[test]
    fn test_bad_time_zone_is_rejected() {
        let err = AppConfig::from_lookup(|k| (k == "LEADBOARD_TZ").then(|| "Mars/Olympus".to_string()));
        assert!(matches!(err, Err(DomainError::InvalidInput(_))));
    }
}
