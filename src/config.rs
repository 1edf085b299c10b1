//! TOML configuration for the lever, the vehicle and the frame loop
//!
//! Every field has a default so partial files load. A missing file degrades
//! to the defaults instead of preventing startup.

use crate::lever::{LeverConfig, LeverError};
use crate::vehicle::{CarSettings, EnvironmentSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "LEVERDRIVE_CONFIG";
const CONFIG_DIR: &str = "leverdrive";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid lever settings: {0}")]
    Invalid(#[from] LeverError),

    #[error("No config directory available on this platform")]
    NoConfigDir,
}

/// Lever section
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LeverSettings {
    pub min_angle: f32,
    pub max_angle: f32,
    pub lock_to_value: bool,
    /// Value the lever starts at, quantized onto a position
    pub initial_value: f32,
}

impl Default for LeverSettings {
    fn default() -> Self {
        let config = LeverConfig::default();
        Self {
            min_angle: config.min_angle,
            max_angle: config.max_angle,
            lock_to_value: config.lock_to_value,
            initial_value: 0.5,
        }
    }
}

impl LeverSettings {
    pub fn lever_config(&self) -> Result<LeverConfig, LeverError> {
        LeverConfig::new(self.min_angle, self.max_angle, self.lock_to_value)
    }
}

/// Which consumer the lever drives
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleMode {
    #[default]
    Car,
    Environment,
}

/// Vehicle section
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct VehicleSettings {
    pub mode: VehicleMode,
    pub forward_speed: f32,
    pub turn_speed: f32,
    pub side_speed: f32,
    /// Initial knob position
    pub knob_value: f32,
}

impl Default for VehicleSettings {
    fn default() -> Self {
        Self {
            mode: VehicleMode::Car,
            forward_speed: 3.0,
            turn_speed: 20.0,
            side_speed: 1.0,
            knob_value: 0.5,
        }
    }
}

impl VehicleSettings {
    pub fn car_settings(&self) -> CarSettings {
        CarSettings {
            forward_speed: self.forward_speed,
            turn_speed: self.turn_speed,
        }
    }

    pub fn environment_settings(&self) -> EnvironmentSettings {
        EnvironmentSettings {
            forward_speed: self.forward_speed,
            side_speed: self.side_speed,
        }
    }
}

/// Frame loop section
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    /// Frames per second
    pub frame_rate: u32,
    /// Frames the demo runs before exiting
    pub frames: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            frame_rate: 72,
            frames: 360,
        }
    }
}

impl SimulationSettings {
    /// Seconds per frame, a zero frame rate is treated as 1 Hz
    pub fn delta_seconds(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub lever: LeverSettings,
    pub vehicle: VehicleSettings,
    pub simulation: SimulationSettings,
}

impl AppConfig {
    /// Parses and validates a TOML document
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let lever = self.lever.lever_config()?;
        if lever.is_degenerate() {
            warn!(
                "Lever min_angle equals max_angle ({}), the lever will stay neutral",
                lever.min_angle
            );
        }

        check_unit("initial_value", self.lever.initial_value)?;
        check_unit("knob_value", self.vehicle.knob_value)?;

        if self.simulation.frame_rate == 0 {
            warn!("Frame rate of 0 requested, running at 1 Hz");
        }
        Ok(())
    }

    /// Location of the config file: `$LEVERDRIVE_CONFIG`, or
    /// `<config dir>/leverdrive/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            debug!("Using config path from {}: {}", CONFIG_PATH_ENV, path);
            return Ok(PathBuf::from(path));
        }

        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Loads a config file
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| io_error(path, source))?;
        let config = Self::parse(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads a config file, falling back to defaults if it does not exist
    pub async fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !tokio::fs::try_exists(path)
            .await
            .map_err(|source| io_error(path, source))?
        {
            warn!("Config file {} does not exist, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path).await
    }

    /// Writes the config, creating parent directories as needed
    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| io_error(parent, source))?;
        }
        tokio::fs::write(path, self.to_toml()?)
            .await
            .map_err(|source| io_error(path, source))?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Writes a default config if none exists yet
    pub async fn ensure_default(path: &Path) -> Result<(), ConfigError> {
        if tokio::fs::try_exists(path)
            .await
            .map_err(|source| io_error(path, source))?
        {
            debug!("Config file {} already exists", path.display());
            return Ok(());
        }
        info!("Creating default config at {}", path.display());
        Self::default().save(path).await
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<(), LeverError> {
    if !value.is_finite() {
        return Err(LeverError::NonFinite { name, value });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(LeverError::ValueOutOfRange { name, value });
    }
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"
            [lever]
            min_angle = -45.0
            lock_to_value = true

            [vehicle]
            mode = "environment"
            "#,
        )
        .unwrap();

        assert_eq!(config.lever.min_angle, -45.0);
        assert_eq!(config.lever.max_angle, 90.0);
        assert!(config.lever.lock_to_value);
        assert_eq!(config.vehicle.mode, VehicleMode::Environment);
        assert_eq!(config.vehicle.forward_speed, 3.0);
        assert_eq!(config.simulation, SimulationSettings::default());
    }

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn out_of_range_angle_is_rejected() {
        let error = AppConfig::parse("[lever]\nmax_angle = 120.0\n").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid(LeverError::AngleOutOfRange { name: "max_angle", .. })
        ));
    }

    #[test]
    fn out_of_range_knob_is_rejected() {
        let error = AppConfig::parse("[vehicle]\nknob_value = 2.0\n").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid(LeverError::ValueOutOfRange { name: "knob_value", .. })
        ));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            AppConfig::parse("[lever\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn equal_limits_are_accepted() {
        let config = AppConfig::parse("[lever]\nmin_angle = 10.0\nmax_angle = 10.0\n").unwrap();
        assert!(config.lever.lever_config().unwrap().is_degenerate());
    }

    #[test]
    fn delta_seconds_guards_zero_rate() {
        let settings = SimulationSettings {
            frame_rate: 0,
            frames: 1,
        };
        assert_eq!(settings.delta_seconds(), 1.0);
    }

    #[tokio::test]
    async fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.lever.min_angle = 60.0;
        config.lever.max_angle = -60.0;
        config.vehicle.mode = VehicleMode::Environment;
        config.save(&path).await.unwrap();

        assert_eq!(AppConfig::load(&path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        assert_eq!(
            AppConfig::load_or_default(&path).await.unwrap(),
            AppConfig::default()
        );
        assert!(AppConfig::load(&path).await.is_err());

        AppConfig::ensure_default(&path).await.unwrap();
        assert!(path.exists());
    }
}
