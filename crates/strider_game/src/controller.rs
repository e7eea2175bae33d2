//! Third-person character controls: keys + camera yaw -> heading, motion and
//! animation blend, with the orbit camera carried along.
//!
//! Per-frame order inside [`CharacterControls::update`]:
//!
//!   1. resolve held keys into a camera-relative [`MoveIntent`]
//!   2. pick the desired clip and cross-fade to it if it changed
//!   3. slerp the model toward the target heading and move it along that heading
//!   4. shift camera and orbit target by the same displacement, then let the
//!      orbit controls apply user input (follow first, orbit second)
//!
//! Movement uses the *target* heading, not the partially turned model
//! orientation, so the character never drifts sideways while turning.

use glam::{Quat, Vec3};
use strider_core::animation::{AnimationMixer, ClipId};
use strider_core::input::KeySet;

use crate::config::ControlsConfig;
use crate::error::{ConfigurationError, Result};
use crate::pose::{heading_forward, heading_of, FollowTarget, MovablePose, OrientedCamera};
use crate::resolve::{resolve_intent, Gait, MoveIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClipSet {
    idle: ClipId,
    walk: ClipId,
    run: ClipId,
}

pub struct CharacterControls<P, C, F> {
    pose: P,
    camera: C,
    follow: F,
    mixer: AnimationMixer,
    config: ControlsConfig,
    clips: ClipSet,
    current_action: ClipId,
    toggle_run: bool,
}

impl<P, C, F> CharacterControls<P, C, F>
where
    P: MovablePose,
    C: OrientedCamera,
    F: FollowTarget,
{
    /// Wire the controls to a loaded character. `initial_clip` starts playing
    /// at full weight; it and the configured idle/walk/run clips must all be
    /// registered with `mixer`.
    pub fn new(
        pose: P,
        mut mixer: AnimationMixer,
        camera: C,
        follow: F,
        initial_clip: &str,
        config: ControlsConfig,
    ) -> Result<Self> {
        config.validate()?;

        let lookup = |name: &str, role: &'static str| {
            mixer
                .registry()
                .get(name)
                .ok_or_else(|| ConfigurationError::MissingClip {
                    name: name.to_string(),
                    role,
                })
        };
        let initial = lookup(initial_clip, "initial")?;
        let clips = ClipSet {
            idle: lookup(&config.clips.idle, "idle")?,
            walk: lookup(&config.clips.walk, "walk")?,
            run: lookup(&config.clips.run, "run")?,
        };

        mixer.play(initial);
        log::info!(
            "Character controls ready: {} clips, playing '{}'",
            mixer.registry().len(),
            initial_clip
        );

        Ok(Self {
            pose,
            camera,
            follow,
            mixer,
            config,
            clips,
            current_action: initial,
            toggle_run: false,
        })
    }

    /// Advance one rendered frame. `elapsed_seconds` is the variable frame
    /// delta; negative or non-finite values are treated as zero.
    pub fn update(&mut self, elapsed_seconds: f32, keys: &KeySet) {
        let dt = sanitize_elapsed(elapsed_seconds);
        let intent = resolve_intent(keys, &self.config.bindings, self.toggle_run);

        self.select_clip(&intent);
        self.mixer.update(dt);

        let displacement = self.integrate(&intent, dt);
        self.sync_camera(displacement);
    }

    /// Flip between walking and running. Takes effect on the next `update`.
    pub fn switch_run_toggle(&mut self) {
        self.toggle_run = !self.toggle_run;
        log::debug!("Run toggle: {}", self.toggle_run);
    }

    fn desired_clip(&self, intent: &MoveIntent) -> ClipId {
        if !intent.is_moving() {
            return self.clips.idle;
        }
        match intent.gait {
            Gait::Walk => self.clips.walk,
            Gait::Run => self.clips.run,
        }
    }

    fn select_clip(&mut self, intent: &MoveIntent) {
        let desired = self.desired_clip(intent);
        if desired == self.current_action {
            return;
        }
        log::debug!(
            "Clip change: '{}' -> '{}'",
            self.mixer.registry().name(self.current_action),
            self.mixer.registry().name(desired)
        );
        self.mixer.cross_fade_to(desired, self.config.fade_duration);
        self.current_action = desired;
    }

    /// Turn and move the model; returns the displacement applied.
    fn integrate(&mut self, intent: &MoveIntent, dt: f32) -> Vec3 {
        let Some(offset) = intent.offset() else {
            return Vec3::ZERO;
        };
        if dt <= 0.0 {
            return Vec3::ZERO;
        }

        let heading = self.camera.yaw() + offset;
        let target_rotation = Quat::from_rotation_y(heading);
        let alpha = (self.config.turn_rate * dt).clamp(0.0, 1.0);
        let current = self.pose.rotation();
        let rotation = current.slerp(target_rotation, alpha).normalize();
        self.pose.set_rotation(rotation);

        let speed = if self.current_action == self.clips.run {
            self.config.run_speed
        } else {
            self.config.walk_speed
        };
        let displacement = heading_forward(heading) * (speed * dt);
        self.pose.set_position(self.pose.position() + displacement);
        displacement
    }

    fn sync_camera(&mut self, displacement: Vec3) {
        if displacement != Vec3::ZERO {
            let camera_position = self.camera.position() + displacement;
            self.camera.set_position(camera_position);
            let target = self.follow.target() + displacement;
            self.follow.set_target(target);
        }
        self.follow.update(&mut self.camera);
    }

    pub fn current_action(&self) -> &str {
        self.mixer.registry().name(self.current_action)
    }

    pub fn current_clip(&self) -> ClipId {
        self.current_action
    }

    pub fn is_running(&self) -> bool {
        self.toggle_run
    }

    /// Model facing about +Y in radians (0 faces -Z).
    pub fn facing_angle(&self) -> f32 {
        heading_of(self.pose.rotation() * Vec3::NEG_Z).unwrap_or(0.0)
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn pose(&self) -> &P {
        &self.pose
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn follow(&self) -> &F {
        &self.follow
    }

    pub fn follow_mut(&mut self) -> &mut F {
        &mut self.follow
    }
}

fn sanitize_elapsed(elapsed: f32) -> f32 {
    if elapsed.is_finite() && elapsed >= 0.0 {
        elapsed
    } else {
        log::warn!("Ignoring invalid frame delta {elapsed}; treating as zero");
        0.0
    }
}
