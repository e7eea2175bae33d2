//! Strider -- headless host for the third-person character controls.
//!
//! Stands in for the demo scene's frame loop without a renderer:
//!
//!   1. load controls config (falls back to defaults)
//!   2. "load" the character: build the clip list the asset loader would hand
//!      over. If that fails the scene keeps running camera-only.
//!   3. per frame: write key events into `InputState`, flip run on a `shift`
//!      press, then `CharacterControls::update` with the frame delta and a key
//!      snapshot. Orbit update happens inside the controls, after follow.
//!
//! Usage: `strider [--realtime] [replay.json]`. Without a replay path the
//! built-in demo script runs. `--realtime` paces frames at ~60 Hz and feeds
//! measured wall-clock deltas instead of the script's.

use std::path::Path;
use std::thread;
use std::time::Duration;

use glam::Vec3;
use strider_core::animation::{AnimationMixer, ClipRegistry};
use strider_core::input::{InputState, Key};
use strider_core::time::FrameClock;
use strider_game::config::{load_controls_config, ControlsConfig};
use strider_game::controller::CharacterControls;
use strider_game::orbit::OrbitControls;
use strider_game::pose::{FollowTarget, LookAtCamera, Transform};
use strider_game::replay::{load_replay_from_path, ReplaySequence, ReplayStep};

const CONFIG_PATH: &str = "assets/config/controls.json";
const DEMO_REPLAY: &str = include_str!("../../../assets/replays/demo.json");
const CAMERA_START: Vec3 = Vec3::new(0.0, 3.0, 6.0);
const TARGET_HEIGHT: f32 = 1.0;
const REALTIME_FRAME: Duration = Duration::from_micros(16_667);
const LOG_EVERY_FRAMES: u64 = 30;

type Character = CharacterControls<Transform, LookAtCamera, OrbitControls>;

enum Scene {
    WithCharacter(Box<Character>),
    CameraOnly {
        camera: LookAtCamera,
        orbit: OrbitControls,
    },
}

fn load_config() -> ControlsConfig {
    let path = Path::new(CONFIG_PATH);
    if !path.exists() {
        log::warn!("Controls config '{}' not found, using defaults.", path.display());
        return ControlsConfig::default();
    }
    match load_controls_config(path) {
        Ok(config) => {
            log::info!("Loaded controls config '{}'", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}; using default controls config");
            ControlsConfig::default()
        }
    }
}

/// Clip list the character asset loader supplies once the model is in.
fn load_character_clips(config: &ControlsConfig) -> Result<ClipRegistry, String> {
    let mut registry = ClipRegistry::new();
    registry.register(&config.clips.idle, 2.0, true)?;
    registry.register(&config.clips.walk, 1.0, true)?;
    registry.register(&config.clips.run, 0.7, true)?;
    Ok(registry)
}

fn camera_rig() -> (LookAtCamera, OrbitControls) {
    let target = Vec3::new(0.0, TARGET_HEIGHT, 0.0);
    let camera = LookAtCamera::new(CAMERA_START, target);
    let mut orbit = OrbitControls::new(target);
    orbit.enable_zoom = true;
    orbit.enable_pan = true;
    (camera, orbit)
}

fn build_scene(config: ControlsConfig) -> Scene {
    let clips = match load_character_clips(&config) {
        Ok(clips) => clips,
        Err(err) => {
            log::error!("Character failed to load: {err}. Continuing without a character.");
            let (camera, orbit) = camera_rig();
            return Scene::CameraOnly { camera, orbit };
        }
    };

    let (camera, orbit) = camera_rig();
    let initial = config.clips.idle.clone();
    match CharacterControls::new(
        Transform::default(),
        AnimationMixer::new(clips),
        camera,
        orbit,
        &initial,
        config,
    ) {
        Ok(character) => Scene::WithCharacter(Box::new(character)),
        Err(err) => {
            log::error!("Character controls rejected: {err}. Continuing without a character.");
            let (camera, orbit) = camera_rig();
            Scene::CameraOnly { camera, orbit }
        }
    }
}

/// Turn a scripted step into key-down/key-up events, as the window would.
fn feed_input(input: &mut InputState, step: &ReplayStep) {
    for &key in Key::ALL {
        let wanted = step.keys.contains(key) || (key == Key::Shift && step.toggle_run);
        if wanted {
            input.key_down(key);
        } else {
            input.key_up(key);
        }
    }
}

fn load_steps(replay_path: Option<&str>) -> Option<Vec<ReplayStep>> {
    let replay = match replay_path {
        Some(path) => match load_replay_from_path(Path::new(path)) {
            Ok(replay) => replay,
            Err(err) => {
                log::error!("{err}");
                return None;
            }
        },
        None => match serde_json::from_str::<ReplaySequence>(DEMO_REPLAY) {
            Ok(replay) => replay,
            Err(err) => {
                log::error!("Built-in demo script is invalid: {err}");
                return None;
            }
        },
    };
    let steps = replay.expanded_steps();
    log::info!(
        "Replaying {} frames ({:.2}s)",
        steps.len(),
        replay.duration()
    );
    Some(steps)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Strider starting...");

    let mut realtime = false;
    let mut replay_path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--realtime" {
            realtime = true;
        } else if arg.starts_with("--") {
            log::warn!("Ignoring unknown flag '{arg}'");
        } else {
            replay_path = Some(arg);
        }
    }

    let Some(steps) = load_steps(replay_path.as_deref()) else {
        std::process::exit(1);
    };

    let mut scene = build_scene(load_config());
    let mut input = InputState::new();
    let mut clock = FrameClock::new();

    for step in &steps {
        feed_input(&mut input, step);
        if input.is_held(Key::Escape) {
            log::info!("Escape pressed, stopping.");
            break;
        }

        let frame_dt = if realtime {
            thread::sleep(REALTIME_FRAME);
            clock.begin_frame()
        } else {
            clock.advance(f64::from(step.dt))
        };
        let dt = frame_dt as f32;

        match &mut scene {
            Scene::WithCharacter(character) => {
                if input.is_just_pressed(Key::Shift) {
                    character.switch_run_toggle();
                }
                character.update(dt, &input.snapshot());

                if clock.frame_count % LOG_EVERY_FRAMES == 0 {
                    let p = character.pose().position;
                    log::debug!(
                        "frame {}: pos ({:.2}, {:.2}, {:.2}) clip '{}'",
                        clock.frame_count,
                        p.x,
                        p.y,
                        p.z,
                        character.current_action()
                    );
                }
            }
            Scene::CameraOnly { camera, orbit } => {
                orbit.update(camera);
            }
        }

        input.end_frame();
    }

    match &scene {
        Scene::WithCharacter(character) => {
            let p = character.pose().position;
            log::info!(
                "Finished {} frames ({:.2}s): pos ({:.2}, {:.2}, {:.2}), facing {:.1} deg, clip '{}', running {}",
                clock.frame_count,
                clock.total_time,
                p.x,
                p.y,
                p.z,
                character.facing_angle().to_degrees(),
                character.current_action(),
                character.is_running()
            );
        }
        Scene::CameraOnly { .. } => {
            log::info!(
                "Finished {} frames ({:.2}s) without a character",
                clock.frame_count,
                clock.total_time
            );
        }
    }
    if realtime {
        log::info!(
            "Average {:.1} fps ({:.2} ms/frame)",
            clock.smoothed_fps,
            clock.smoothed_frame_time_ms
        );
    }
}
