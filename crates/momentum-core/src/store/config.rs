//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Countdown lengths for micro-actions and the wind-down ritual
//! - Wind-down clock time and chime toggle
//! - Autosave debounce timings
//! - Weekly ring goals for the habit report
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::calendar::parse_clock_time;

/// Countdown lengths in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_action_secs")]
    pub action_secs: u64,
    #[serde(default = "default_wind_down_secs")]
    pub wind_down_secs: u64,
}

/// Evening ritual configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RitualConfig {
    /// Wall-clock HH:MM the wind-down window opens.
    /// Seeds the ritual state on first run only; after that the
    /// persisted state owns the value.
    #[serde(default = "default_wind_down_time")]
    pub wind_down_time: String,
    #[serde(default = "default_true")]
    pub chime_enabled: bool,
}

/// Autosave debounce timings in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_write_interval_ms")]
    pub min_write_interval_ms: u64,
}

/// Weekly habit goals backing the ring report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_meditation_goal")]
    pub meditation: u32,
    #[serde(default = "default_strength_goal")]
    pub strength: u32,
    #[serde(default = "default_steps_goal")]
    pub steps: u32,
    #[serde(default = "default_fun_goal")]
    pub fun: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub ritual: RitualConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub goals: GoalsConfig,
}

// Default functions
fn default_action_secs() -> u64 {
    120
}
fn default_wind_down_secs() -> u64 {
    600
}
fn default_wind_down_time() -> String {
    "20:30".into()
}
fn default_true() -> bool {
    true
}
fn default_debounce_ms() -> u64 {
    800
}
fn default_min_write_interval_ms() -> u64 {
    250
}
fn default_meditation_goal() -> u32 {
    7
}
fn default_strength_goal() -> u32 {
    2
}
fn default_steps_goal() -> u32 {
    4
}
fn default_fun_goal() -> u32 {
    4
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            action_secs: default_action_secs(),
            wind_down_secs: default_wind_down_secs(),
        }
    }
}

impl Default for RitualConfig {
    fn default() -> Self {
        Self {
            wind_down_time: default_wind_down_time(),
            chime_enabled: true,
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_write_interval_ms: default_min_write_interval_ms(),
        }
    }
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            meditation: default_meditation_goal(),
            strength: default_strength_goal(),
            steps: default_steps_goal(),
            fun: default_fun_goal(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            ritual: RitualConfig::default(),
            autosave: AutosaveConfig::default(),
            goals: GoalsConfig::default(),
        }
    }
}

impl Config {
    fn value_at_path<'a>(
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

    fn write_at_path(
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
        let val = Self::value_at_path(&json, key)?;
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
        Self::write_at_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    /// The configured wind-down time, falling back to 20:30 when the
    /// string does not parse.
    pub fn wind_down_time(&self) -> NaiveTime {
        parse_clock_time(&self.ritual.wind_down_time)
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(20, 30, 0).unwrap_or(NaiveTime::MIN))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.action_secs, 120);
        assert_eq!(parsed.autosave.debounce_ms, 800);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.action_secs").as_deref(), Some("120"));
        assert_eq!(cfg.get("ritual.chime_enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("ritual.wind_down_time").as_deref(), Some("20:30"));
        assert!(cfg.get("ritual.missing_key").is_none());
    }

    #[test]
    fn write_at_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::write_at_path(&mut json, "goals.steps", "6").unwrap();
        assert_eq!(
            Config::value_at_path(&json, "goals.steps").unwrap(),
            &serde_json::Value::Number(6.into())
        );
    }

    #[test]
    fn write_at_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::write_at_path(&mut json, "ritual.nonexistent_key", "value");
        assert!(result.is_err());
    }

    #[test]
    fn write_at_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::write_at_path(&mut json, "ritual.chime_enabled", "not_a_bool");
        assert!(result.is_err());
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timer.action_secs, 120);
        assert_eq!(cfg.timer.wind_down_secs, 600);
        assert_eq!(cfg.ritual.wind_down_time, "20:30");
        assert!(cfg.ritual.chime_enabled);
        assert_eq!(cfg.autosave.min_write_interval_ms, 250);
        assert_eq!(cfg.goals.meditation, 7);
        assert_eq!(cfg.goals.strength, 2);
    }

    #[test]
    fn wind_down_time_falls_back_on_garbage() {
        let mut cfg = Config::default();
        cfg.ritual.wind_down_time = "bedtime".into();
        assert_eq!(
            cfg.wind_down_time(),
            NaiveTime::from_hms_opt(20, 30, 0).unwrap()
        );
        cfg.ritual.wind_down_time = "21:15".into();
        assert_eq!(
            cfg.wind_down_time(),
            NaiveTime::from_hms_opt(21, 15, 0).unwrap()
        );
    }
}
