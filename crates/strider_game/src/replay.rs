use serde::Deserialize;
use std::fs;
use std::path::Path;
use strider_core::input::KeySet;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    /// Frame delta used when a frame does not set its own.
    #[serde(default = "default_dt")]
    pub dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub keys: Vec<String>,
    /// Press the run toggle on the first repetition of this frame.
    #[serde(default)]
    pub toggle_run: bool,
    #[serde(default)]
    pub dt: Option<f32>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// One expanded frame of input.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub dt: f32,
    pub keys: KeySet,
    pub toggle_run: bool,
}

impl ReplaySequence {
    pub fn expanded_steps(&self) -> Vec<ReplayStep> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let keys = KeySet::from_names(&frame.keys);
            let dt = frame.dt.unwrap_or(self.dt);
            for i in 0..frame.repeat.max(1) {
                out.push(ReplayStep {
                    dt,
                    keys: keys.clone(),
                    toggle_run: frame.toggle_run && i == 0,
                });
            }
        }
        out
    }

    /// Total simulated time across all expanded frames.
    pub fn duration(&self) -> f32 {
        self.frames
            .iter()
            .map(|f| f.dt.unwrap_or(self.dt).max(0.0) * f.repeat.max(1) as f32)
            .sum()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if !(replay.dt.is_finite() && replay.dt > 0.0) {
        return Err("Replay validation failed: dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
