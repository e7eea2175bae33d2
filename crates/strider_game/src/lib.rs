//! Third-person character locomotion: camera-relative movement from held keys,
//! smooth turning, idle/walk/run cross-fades, and an orbit camera that follows.

pub mod config;
pub mod controller;
pub mod error;
pub mod orbit;
pub mod pose;
pub mod replay;
pub mod resolve;

pub use config::{load_controls_config, ControlsConfig};
pub use controller::CharacterControls;
pub use error::ConfigurationError;
pub use orbit::OrbitControls;
pub use pose::{FollowTarget, MovablePose, OrientedCamera, LookAtCamera, Transform};
