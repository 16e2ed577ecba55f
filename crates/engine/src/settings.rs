//! Engine configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CAPKIT_UPDATE_INTERVAL_SECS` | `0.1` |
//! | `CAPKIT_TICK_CAPABILITIES` | `true` |
//! | `CAPKIT_TIME_SOURCE` | `game` (`game` or `wall`) |
//! | `CAPKIT_FRAME_DELTA_SECS` | `1/60` |
//! | `CAPKIT_FRAMES` | `600` |
//! | `CAPKIT_CAPABILITIES` | `Regeneration,Sprint,StaminaRecovery` |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use capkit_domain::{DomainError, ManagerSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_UPDATE_INTERVAL: &str = "CAPKIT_UPDATE_INTERVAL_SECS";
pub const ENV_TICK_CAPABILITIES: &str = "CAPKIT_TICK_CAPABILITIES";
pub const ENV_TIME_SOURCE: &str = "CAPKIT_TIME_SOURCE";
pub const ENV_FRAME_DELTA: &str = "CAPKIT_FRAME_DELTA_SECS";
pub const ENV_FRAMES: &str = "CAPKIT_FRAMES";
pub const ENV_CAPABILITIES: &str = "CAPKIT_CAPABILITIES";

const DEFAULT_FRAME_DELTA_SECONDS: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 600;
const DEFAULT_CAPABILITIES: [&str; 3] = ["Regeneration", "Sprint", "StaminaRecovery"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("Invalid settings: {0}")]
    Domain(#[from] DomainError),
}

impl SettingsError {
    fn invalid(key: &'static str, value: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Where the world reads "now" from for the activation throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSource {
    /// Accumulated frame deltas.
    #[default]
    Game,
    /// Wall time since the world was created.
    Wall,
}

impl fmt::Display for TimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSource::Game => write!(f, "game"),
            TimeSource::Wall => write!(f, "wall"),
        }
    }
}

impl FromStr for TimeSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "game" => Ok(TimeSource::Game),
            "wall" | "system" => Ok(TimeSource::Wall),
            _ => Err(DomainError::parse(format!("Unknown time source: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub manager: ManagerSettings,
    /// When false, entities skip their manager's per-frame tick.
    pub tick_capabilities: bool,
    pub time_source: TimeSource,
    pub frame_delta_seconds: f32,
    pub frames: u32,
    /// Capability class names added by `World::spawn_with_defaults`.
    pub default_capabilities: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            manager: ManagerSettings::default(),
            tick_capabilities: true,
            time_source: TimeSource::default(),
            frame_delta_seconds: DEFAULT_FRAME_DELTA_SECONDS,
            frames: DEFAULT_FRAMES,
            default_capabilities: DEFAULT_CAPABILITIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineSettings {
    /// Load from the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_vars(std::env::vars())
    }

    /// Load from explicit key/value pairs. Unrelated keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();

        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_UPDATE_INTERVAL => {
                    settings.manager.update_interval_seconds = parse_seconds(ENV_UPDATE_INTERVAL, value)?;
                }
                ENV_TICK_CAPABILITIES => {
                    settings.tick_capabilities = parse_bool(ENV_TICK_CAPABILITIES, value)?;
                }
                ENV_TIME_SOURCE => {
                    settings.time_source = value
                        .parse()
                        .map_err(|e| SettingsError::invalid(ENV_TIME_SOURCE, value, e))?;
                }
                ENV_FRAME_DELTA => {
                    settings.frame_delta_seconds = parse_seconds(ENV_FRAME_DELTA, value)?;
                }
                ENV_FRAMES => {
                    settings.frames = value
                        .trim()
                        .parse()
                        .map_err(|e| SettingsError::invalid(ENV_FRAMES, value, e))?;
                }
                ENV_CAPABILITIES => {
                    settings.default_capabilities = value
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                _ => {}
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.manager.validate()?;
        if !self.frame_delta_seconds.is_finite() || self.frame_delta_seconds <= 0.0 {
            return Err(DomainError::validation(format!(
                "frame delta must be a positive number of seconds (got {})",
                self.frame_delta_seconds
            ))
            .into());
        }
        self.frame_duration()?;
        Ok(())
    }

    /// Frame delta as a sleep duration for wall-clock runs.
    pub fn frame_duration(&self) -> Result<Duration, SettingsError> {
        Duration::try_from_secs_f32(self.frame_delta_seconds).map_err(|e| {
            SettingsError::invalid(ENV_FRAME_DELTA, &self.frame_delta_seconds.to_string(), e)
        })
    }
}

fn parse_seconds(key: &'static str, value: &str) -> Result<f32, SettingsError> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|e| SettingsError::invalid(key, value, e))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::invalid(key, value, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_variables() {
        let settings = EngineSettings::from_vars(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.manager.update_interval_seconds, 0.1);
        assert!(settings.tick_capabilities);
        assert_eq!(settings.time_source, TimeSource::Game);
        assert_eq!(
            settings.default_capabilities,
            vec!["Regeneration", "Sprint", "StaminaRecovery"]
        );
    }

    #[test]
    fn variables_override_defaults() {
        let settings = EngineSettings::from_vars([
            (ENV_UPDATE_INTERVAL, "0.25"),
            (ENV_TICK_CAPABILITIES, "off"),
            (ENV_TIME_SOURCE, "Wall"),
            (ENV_FRAME_DELTA, "0.02"),
            (ENV_FRAMES, "30"),
            (ENV_CAPABILITIES, " Sprint , ,Regeneration "),
            ("PATH", "/usr/bin"),
        ])
        .unwrap();

        assert_eq!(settings.manager.update_interval_seconds, 0.25);
        assert!(!settings.tick_capabilities);
        assert_eq!(settings.time_source, TimeSource::Wall);
        assert_eq!(settings.frame_delta_seconds, 0.02);
        assert_eq!(settings.frames, 30);
        assert_eq!(settings.default_capabilities, vec!["Sprint", "Regeneration"]);
    }

    #[test]
    fn unparseable_value_names_the_variable() {
        let err = EngineSettings::from_vars([(ENV_FRAMES, "many")]).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidValue { key: ENV_FRAMES, .. }
        ));
        assert!(err.to_string().contains("CAPKIT_FRAMES"));
    }

    #[test]
    fn negative_interval_is_rejected() {
        let err = EngineSettings::from_vars([(ENV_UPDATE_INTERVAL, "-1")]).unwrap_err();
        assert!(matches!(err, SettingsError::Domain(DomainError::Validation(_))));
    }

    #[test]
    fn zero_frame_delta_is_rejected() {
        assert!(EngineSettings::from_vars([(ENV_FRAME_DELTA, "0")]).is_err());
    }

    #[test]
    fn oversized_frame_delta_is_rejected() {
        let err = EngineSettings::from_vars([(ENV_TIME_SOURCE, "wall"), (ENV_FRAME_DELTA, "1e20")])
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidValue { key: ENV_FRAME_DELTA, .. }
        ));
    }

    #[test]
    fn frame_duration_matches_delta() {
        let settings = EngineSettings {
            frame_delta_seconds: 0.5,
            ..EngineSettings::default()
        };
        assert_eq!(settings.frame_duration().unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn unknown_time_source_is_rejected() {
        assert!(EngineSettings::from_vars([(ENV_TIME_SOURCE, "sundial")]).is_err());
        assert_eq!("system".parse::<TimeSource>().unwrap(), TimeSource::Wall);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"timeSource":"wall","manager":{"updateIntervalSeconds":0.5}}"#)
                .unwrap();

        assert_eq!(settings.time_source, TimeSource::Wall);
        assert_eq!(settings.manager.update_interval_seconds, 0.5);
        assert_eq!(settings.frames, DEFAULT_FRAMES);
    }
}
