use crate::domain::models::availability::Language;
use crate::error::AppError;
use chrono_tz::Tz;
use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: String,
    pub timezone: Tz,
    pub language: Language,
    pub session_duration_min: i64,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let timezone = lookup("TUTORING_TIMEZONE").unwrap_or_else(|| "America/Lima".to_string());
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| AppError::Config(format!("TUTORING_TIMEZONE '{}' is not an IANA zone", timezone)))?;

        let language = match lookup("TUTORING_LANGUAGE") {
            Some(raw) => raw.parse::<Language>().map_err(AppError::Config)?,
            None => Language::default(),
        };

        let session_duration_min = lookup("TUTORING_SESSION_MINUTES")
            .unwrap_or_else(|| "60".to_string())
            .parse::<i64>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| AppError::Config("TUTORING_SESSION_MINUTES must be a positive number".into()))?;

        let timeout_secs = lookup("TUTORING_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "15".to_string())
            .parse::<u64>()
            .map_err(|_| AppError::Config("TUTORING_HTTP_TIMEOUT_SECS must be a number".into()))?;

        Ok(Self {
            api_base_url: required("TUTORING_API_URL")?,
            api_token: required("TUTORING_API_TOKEN")?,
            timezone,
            language,
            session_duration_min,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("TUTORING_API_URL", "https://api.incadev.test/api"),
            ("TUTORING_API_TOKEN", "abc"),
        ]))
        .unwrap();

        assert_eq!(config.timezone, chrono_tz::America::Lima);
        assert_eq!(config.language, Language::Es);
        assert_eq!(config.session_duration_min, 60);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TUTORING_API_URL", "http://localhost:8000"),
            ("TUTORING_API_TOKEN", "abc"),
            ("TUTORING_TIMEZONE", "Europe/Madrid"),
            ("TUTORING_LANGUAGE", "en"),
            ("TUTORING_SESSION_MINUTES", "45"),
            ("TUTORING_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.timezone, chrono_tz::Europe::Madrid);
        assert_eq!(config.language, Language::En);
        assert_eq!(config.session_duration_min, 45);
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_or_invalid_values() {
        let missing_token = Config::from_lookup(lookup_from(&[("TUTORING_API_URL", "http://x")]));
        assert!(matches!(missing_token, Err(AppError::Config(msg)) if msg.contains("TUTORING_API_TOKEN")));

        let bad_zone = Config::from_lookup(lookup_from(&[
            ("TUTORING_API_URL", "http://x"),
            ("TUTORING_API_TOKEN", "t"),
            ("TUTORING_TIMEZONE", "Mars/Olympus"),
        ]));
        assert!(matches!(bad_zone, Err(AppError::Config(_))));

        let zero_minutes = Config::from_lookup(lookup_from(&[
            ("TUTORING_API_URL", "http://x"),
            ("TUTORING_API_TOKEN", "t"),
            ("TUTORING_SESSION_MINUTES", "0"),
        ]));
        assert!(matches!(zero_minutes, Err(AppError::Config(_))));
    }
}
