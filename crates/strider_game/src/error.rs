use std::path::PathBuf;

use thiserror::Error;

/// Caller mistakes detected while wiring up the character controls.
///
/// These are raised at construction or config-load time only; the per-frame
/// update never fails.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A clip name required by the controller is not in the clip registry.
    #[error("{role} clip '{name}' is not registered with the animation mixer")]
    MissingClip { name: String, role: &'static str },

    /// A tuning value is out of range.
    #[error("invalid controls config: {0}")]
    InvalidTuning(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
