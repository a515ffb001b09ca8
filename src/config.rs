use crate::error::AppError;
use crate::pipeline::services::scoring::RuleTable;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

/// Looked up next to the working directory when no explicit file is given.
pub const DEFAULT_SETTINGS_FILE: &str = "monuments";
pub const ENV_PREFIX: &str = "MONUMENTS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub confidence_threshold: f64,
    pub log_level: String,
    /// TOML rule table replacing the built-in one.
    pub rules_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            log_level: "info".to_string(),
            rules_path: None,
        }
    }
}

impl Settings {
    /// Defaults, then the settings file, then `MONUMENTS_*` environment
    /// variables.
    ///
    /// The result is not validated: callers apply their own overrides first
    /// and then call [`Settings::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, AppError> {
        let defaults = Settings::default();
        let builder = Config::builder()
            .set_default("confidence_threshold", defaults.confidence_threshold)?
            .set_default("log_level", defaults.log_level)?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_SETTINGS_FILE).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix(env_prefix))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "Confidence threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            ));
        }

        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level, String> {
        Level::from_str(&self.log_level)
            .map_err(|_| format!("Unknown log level '{}'", self.log_level))
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_rules_path(mut self, path: PathBuf) -> Self {
        self.rules_path = Some(path);
        self
    }

    /// The configured rule table, or the built-in one when none is set.
    pub fn load_rules(&self) -> Result<RuleTable, AppError> {
        match &self.rules_path {
            Some(path) => load_rule_table(path),
            None => Ok(RuleTable::default()),
        }
    }
}

pub fn load_rule_table(path: &Path) -> Result<RuleTable, AppError> {
    let table: RuleTable = Config::builder()
        .add_source(File::from(path))
        .build()?
        .try_deserialize()?;
    Ok(table.validated()?)
}
