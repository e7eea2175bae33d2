pub mod animation;
pub mod input;
pub mod time;

pub use animation::{AnimationClip, AnimationMixer, ClipId, ClipRegistry};
pub use input::{InputState, Key, KeySet};
pub use time::FrameClock;
