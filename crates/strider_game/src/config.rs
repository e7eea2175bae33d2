//! Tuning and key bindings for the character controls, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```json
//! { "version": "0.1", "run_speed": 6.0, "bindings": { "forward": ["w", "arrowup"] } }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use strider_core::input::Key;

use crate::error::{ConfigurationError, Result};

const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    pub version: String,
    /// Ground speed while the walk clip is current, units per second.
    pub walk_speed: f32,
    /// Ground speed while the run clip is current. Must exceed `walk_speed`.
    pub run_speed: f32,
    /// Cross-fade length in seconds.
    pub fade_duration: f32,
    /// Slerp rate toward the target heading, per second. The per-frame factor
    /// is `turn_rate * dt` clamped to [0, 1].
    pub turn_rate: f32,
    pub clips: ClipNames,
    pub bindings: KeyBindings,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION.to_string(),
            walk_speed: 2.0,
            run_speed: 5.0,
            fade_duration: 0.2,
            turn_rate: 10.0,
            clips: ClipNames::default(),
            bindings: KeyBindings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClipNames {
    pub idle: String,
    pub walk: String,
    pub run: String,
}

impl Default for ClipNames {
    fn default() -> Self {
        Self {
            idle: "Idle".to_string(),
            walk: "Walk".to_string(),
            run: "Run".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: Vec<Key>,
    pub back: Vec<Key>,
    pub left: Vec<Key>,
    pub right: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec![Key::W, Key::Up],
            back: vec![Key::S, Key::Down],
            left: vec![Key::A, Key::Left],
            right: vec![Key::D, Key::Right],
        }
    }
}

impl ControlsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != SUPPORTED_VERSION {
            return Err(ConfigurationError::InvalidTuning(format!(
                "unsupported version '{}'",
                self.version
            )));
        }
        check_positive("walk_speed", self.walk_speed)?;
        check_positive("run_speed", self.run_speed)?;
        check_positive("fade_duration", self.fade_duration)?;
        check_positive("turn_rate", self.turn_rate)?;
        if self.run_speed <= self.walk_speed {
            return Err(ConfigurationError::InvalidTuning(format!(
                "run_speed ({}) must be greater than walk_speed ({})",
                self.run_speed, self.walk_speed
            )));
        }

        for (role, name) in [
            ("idle", &self.clips.idle),
            ("walk", &self.clips.walk),
            ("run", &self.clips.run),
        ] {
            if name.is_empty() {
                return Err(ConfigurationError::InvalidTuning(format!(
                    "clips.{role} is empty"
                )));
            }
        }
        let clips = &self.clips;
        if clips.idle == clips.walk || clips.idle == clips.run || clips.walk == clips.run {
            return Err(ConfigurationError::InvalidTuning(format!(
                "clips must name three different clips (idle '{}', walk '{}', run '{}')",
                clips.idle, clips.walk, clips.run
            )));
        }

        for (role, keys) in [
            ("forward", &self.bindings.forward),
            ("back", &self.bindings.back),
            ("left", &self.bindings.left),
            ("right", &self.bindings.right),
        ] {
            if keys.is_empty() {
                return Err(ConfigurationError::InvalidTuning(format!(
                    "bindings.{role} has no keys"
                )));
            }
        }
        Ok(())
    }
}

fn check_positive(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidTuning(format!(
            "{field} must be a positive finite number, got {value}"
        )))
    }
}

/// Load and validate a controls config file.
pub fn load_controls_config(path: &Path) -> Result<ControlsConfig> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ControlsConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigurationError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
