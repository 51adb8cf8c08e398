//! TOML-based application configuration.
//!
//! Stores the tunable parameters of both test flows:
//! - Aptitude countdown budget
//! - Personality questions sampled per stream (and an optional RNG seed)
//! - Sentiment-analysis service endpoint and timeout
//!
//! Configuration is stored at `~/.config/csr/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;

/// Aptitude-test configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeConfig {
    /// Countdown budget for the whole test, in minutes.
    #[serde(default = "default_time_budget_min")]
    pub time_budget_min: u64,
}

/// Personality-test configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityConfig {
    /// Questions sampled per stream. Clamped to the pool size when a
    /// stream has fewer questions than this.
    #[serde(default = "default_questions_per_stream")]
    pub questions_per_stream: usize,
    /// Fixed RNG seed for question sampling (None = seed from entropy).
    #[serde(default)]
    pub sampling_seed: Option<u64>,
}

/// Sentiment-analysis service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Endpoint the free-text responses are POSTed to.
    #[serde(default = "default_sentiment_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/csr/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aptitude: AptitudeConfig,
    #[serde(default)]
    pub personality: PersonalityConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
}

// Default functions
fn default_time_budget_min() -> u64 {
    30
}
fn default_questions_per_stream() -> usize {
    2
}
fn default_sentiment_endpoint() -> String {
    "http://localhost:8765/analyze".into()
}
fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for AptitudeConfig {
    fn default() -> Self {
        Self {
            time_budget_min: default_time_budget_min(),
        }
    }
}

impl Default for PersonalityConfig {
    fn default() -> Self {
        Self {
            questions_per_stream: default_questions_per_stream(),
            sampling_seed: None,
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            endpoint: default_sentiment_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aptitude: AptitudeConfig::default(),
            personality: PersonalityConfig::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| format!("cannot parse '{value}' as number"))?
                        } else {
                            return Err(format!("cannot parse '{value}' as number").into());
                        }
                    }
                    serde_json::Value::Null => {
                        // Optional numeric fields (e.g. the sampling seed).
                        serde_json::Value::Number(value.parse::<u64>()?.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}").into())
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
