//! Environment-driven configuration for the service layer.

use std::env;
use std::path::PathBuf;

use reqwest::Url;

use crate::error::ConfigError;
use crate::evaluation::AiEvaluatorConfig;

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";
pub const DEFAULT_DB_URL: &str = "sqlite://civics.sqlite3";

/// Where questions come from, how answers are graded and where preferences live.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub questions_path: PathBuf,
    /// Quiz server base URL. When set, questions, grading and flashcards use it.
    pub server_url: Option<String>,
    pub ai: Option<AiEvaluatorConfig>,
    /// Grade locally when the grading service fails.
    pub evaluation_fallback: bool,
    pub db_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from(DEFAULT_QUESTIONS_PATH),
            server_url: None,
            ai: None,
            evaluation_fallback: false,
            db_url: DEFAULT_DB_URL.into(),
        }
    }
}

impl AppConfig {
    /// Read `CIVICS_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` for a malformed server URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` for a malformed server URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let questions_path = non_blank("CIVICS_QUESTIONS_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_QUESTIONS_PATH), PathBuf::from);
        let server_url = non_blank("CIVICS_SERVER_URL")
            .map(|raw| validate_url("CIVICS_SERVER_URL", raw))
            .transpose()?;
        let evaluation_fallback = non_blank("CIVICS_EVALUATION_FALLBACK")
            .is_some_and(|raw| parse_flag(&raw));
        let db_url = non_blank("CIVICS_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into());

        Ok(Self {
            questions_path,
            server_url,
            ai: AiEvaluatorConfig::from_lookup(&lookup),
            evaluation_fallback,
            db_url,
        })
    }

    /// Point at a quiz server, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` for a malformed URL.
    pub fn with_server_url(mut self, raw: impl Into<String>) -> Result<Self, ConfigError> {
        self.server_url = Some(validate_url("--server", raw.into())?);
        Ok(self)
    }

    #[must_use]
    pub fn with_questions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.questions_path = path.into();
        self
    }

    #[must_use]
    pub fn with_db_url(mut self, db_url: impl Into<String>) -> Self {
        self.db_url = db_url.into();
        self
    }
}

fn validate_url(key: &'static str, raw: String) -> Result<String, ConfigError> {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(raw.trim().to_string()),
        _ => Err(ConfigError::InvalidUrl { key, raw }),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.questions_path, PathBuf::from("questions.json"));
        assert_eq!(config.server_url, None);
        assert!(config.ai.is_none());
        assert!(!config.evaluation_fallback);
        assert_eq!(config.db_url, DEFAULT_DB_URL);
    }

    #[test]
    fn reads_every_key() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CIVICS_QUESTIONS_PATH", "data/q.json"),
            ("CIVICS_SERVER_URL", "http://localhost:5000"),
            ("CIVICS_AI_API_KEY", "sk-test"),
            ("CIVICS_EVALUATION_FALLBACK", "TRUE"),
            ("CIVICS_DB_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(config.questions_path, PathBuf::from("data/q.json"));
        assert_eq!(config.server_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.ai.unwrap().api_key, "sk-test");
        assert!(config.evaluation_fallback);
        assert_eq!(config.db_url, "sqlite::memory:");
    }

    #[test]
    fn rejects_malformed_server_url() {
        let err = AppConfig::from_lookup(lookup(&[("CIVICS_SERVER_URL", "localhost:5000")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl { key: "CIVICS_SERVER_URL", .. }
        ));

        let err = AppConfig::default().with_server_url("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { key: "--server", .. }));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CIVICS_SERVER_URL", "  "),
            ("CIVICS_EVALUATION_FALLBACK", "0"),
        ]))
        .unwrap();
        assert_eq!(config.server_url, None);
        assert!(!config.evaluation_fallback);
    }
}
