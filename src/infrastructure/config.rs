use std::env;
use std::time::Duration;

use crate::services::DisplayNames;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    /// Username -> display name, from the `DISPLAY_NAMES` JSON object
    pub display_names: DisplayNames,
    pub seed_demo: bool,
    pub cover_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://sixtybooks.db?mode=rwc".to_string()
            } else {
                format!("sqlite://sixtybooks_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            profile,
            display_names: DisplayNames::parse(env::var("DISPLAY_NAMES").ok().as_deref()),
            seed_demo: env::var("SEED_DEMO").is_ok(),
            cover_timeout: env::var("COVER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(10)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "PROFILE",
        "DATABASE_URL",
        "PORT",
        "CORS_ALLOWED_ORIGINS",
        "DISPLAY_NAMES",
        "SEED_DEMO",
        "COVER_TIMEOUT_SECS",
    ];

    fn clear() {
        for var in VARS {
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        let config = Config::from_env();
        assert_eq!(config.database_url, "sqlite://sixtybooks.db?mode=rwc");
        assert_eq!(config.port, 8000);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.display_names.is_empty());
        assert!(!config.seed_demo);
        assert_eq!(config.cover_timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_reads_environment() {
        clear();
        unsafe {
            env::set_var("PROFILE", "demo");
            env::set_var("PORT", "9100");
            env::set_var("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,");
            env::set_var("DISPLAY_NAMES", r#"{"alice": "Alice"}"#);
            env::set_var("SEED_DEMO", "1");
        }

        let config = Config::from_env();
        assert_eq!(config.database_url, "sqlite://sixtybooks_demo.db?mode=rwc");
        assert_eq!(config.port, 9100);
        assert_eq!(config.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.display_names.display_name("alice"), "Alice");
        assert!(config.seed_demo);

        clear();
    }

    #[test]
    #[serial]
    fn test_malformed_display_names_are_ignored() {
        clear();
        unsafe { env::set_var("DISPLAY_NAMES", "{oops") };
        let config = Config::from_env();
        assert!(config.display_names.is_empty());
        clear();
    }
}
