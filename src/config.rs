//! Panel configuration
//!
//! Read from a JSON file. Every key is optional; missing keys fall back to
//! the defaults below.

use crate::dispatch::{DispatchSettings, EntrainSettings};
use crate::{Result, TeleopError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "teleop_config.json";

/// Configuration for the teleop panel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleopConfig {
    /// Option buttons per script line
    pub options: usize,

    /// Prefix for audio paths sent to the entrainer
    pub audio_base_dir: String,

    /// Prefix for viseme paths sent to the entrainer
    pub viseme_base_dir: String,

    /// Script loaded at startup
    pub script: Option<PathBuf>,

    /// Static script loaded at startup
    pub static_script: Option<PathBuf>,

    /// Directory offered by the script picker
    pub script_dir: PathBuf,

    /// Directory offered by the static script picker
    pub static_script_dir: PathBuf,

    /// Route speech through the audio entrainer
    pub use_entrainer: bool,

    /// Initial speaker age for the entrainer
    pub speaker_age: u32,

    /// Wait for the robot to go idle before each command
    pub idle_timeout_ms: u64,

    /// Wait for sound to start after a speech command
    pub speech_start_timeout_ms: u64,

    /// Wait for motion to start after an animation command
    pub motion_start_timeout_ms: u64,

    /// Status re-check interval while waiting
    pub poll_interval_ms: u64,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            options: 1,
            audio_base_dir: String::new(),
            viseme_base_dir: String::new(),
            script: None,
            static_script: None,
            script_dir: PathBuf::from("../scripts"),
            static_script_dir: PathBuf::from("../static_scripts"),
            use_entrainer: false,
            speaker_age: 5,
            idle_timeout_ms: 60_000,
            speech_start_timeout_ms: 15_000,
            motion_start_timeout_ms: 8_000,
            poll_interval_ms: 100,
        }
    }
}

impl TeleopConfig {
    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TeleopError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: TeleopConfig = serde_json::from_str(&content).map_err(|e| {
            TeleopError::ConfigError(format!("Failed to parse '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        info!("Config file {} says: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load a config file, falling back to defaults if it is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.options == 0 {
            return Err(TeleopError::ConfigError(
                "options must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(TeleopError::ConfigError(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Turn the entrainer on
    pub fn with_entrainer(mut self) -> Self {
        self.use_entrainer = true;
        self
    }

    /// Set the number of option slots per line
    pub fn with_options(mut self, options: usize) -> Self {
        self.options = options.max(1);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Fixed parameters for the dispatcher
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            audio_base_dir: self.audio_base_dir.clone(),
            viseme_base_dir: self.viseme_base_dir.clone(),
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            speech_start_timeout: Duration::from_millis(self.speech_start_timeout_ms),
            motion_start_timeout: Duration::from_millis(self.motion_start_timeout_ms),
        }
    }

    /// Initial entrainer settings for a session
    pub fn entrain_settings(&self) -> EntrainSettings {
        EntrainSettings {
            enabled: self.use_entrainer,
            speaker_age: self.speaker_age,
            entrain: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TeleopConfig::default();
        assert_eq!(config.options, 1);
        assert!(!config.use_entrainer);
        assert_eq!(config.speech_start_timeout_ms, 15_000);
        assert_eq!(config.motion_start_timeout_ms, 8_000);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TeleopConfig = serde_json::from_str(
            r#"{"options": 3, "audio_base_dir": "/audio/", "script": "../scripts/s1.txt"}"#,
        )
        .unwrap();
        assert_eq!(config.options, 3);
        assert_eq!(config.audio_base_dir, "/audio/");
        assert_eq!(config.script, Some(PathBuf::from("../scripts/s1.txt")));
        assert_eq!(config.viseme_base_dir, "");
        assert_eq!(config.speaker_age, 5);
    }

    #[test]
    fn test_zero_options_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"options": 0}}"#).unwrap();
        assert!(matches!(
            TeleopConfig::load(file.path()),
            Err(TeleopError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "options = 2").unwrap();
        assert_eq!(TeleopConfig::load_or_default(file.path()), TeleopConfig::default());
    }

    #[test]
    fn test_config_builder() {
        let config = TeleopConfig::default().with_entrainer().with_options(0);
        assert!(config.use_entrainer);
        assert_eq!(config.options, 1);
        assert!(config.entrain_settings().enabled);
    }
}
