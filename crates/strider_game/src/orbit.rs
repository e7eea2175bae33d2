//! Orbit controls: rotate, dolly and pan a camera around a look-at target.
//!
//! User requests (`rotate_left`, `rotate_up`, `dolly_in`, `pan`) are queued and
//! applied in `update`, which the character controls call after they have
//! shifted both camera and target by the character's displacement. Because the
//! follow shift moves camera and target together, the spherical offset seen by
//! `update` is unchanged by following; only queued user input moves the camera
//! relative to the target.
//!
//! Spherical coordinates: `theta` is the azimuth around +Y measured from +Z,
//! `phi` the polar angle from +Y.

use std::f32::consts::PI;

use glam::Vec3;

use crate::pose::{FollowTarget, OrientedCamera};

/// Keeps the polar angle off the poles so the look direction always has a
/// horizontal component.
const POLE_EPSILON: f32 = 1e-3;
/// Pending motion below this magnitude is dropped.
const SETTLE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_damping: bool,
    /// Fraction of pending motion applied per update when damping is on.
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_right: f32,
    pan_up: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            enable_damping: false,
            damping_factor: 0.05,
            min_distance: 0.5,
            max_distance: 500.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_right: 0.0,
            pan_up: 0.0,
        }
    }

    /// Orbit counter-clockwise (seen from above) by `angle` radians.
    pub fn rotate_left(&mut self, angle: f32) {
        if self.enable_rotate && angle.is_finite() {
            self.delta_theta += angle;
        }
    }

    /// Raise the camera toward the top pole by `angle` radians.
    pub fn rotate_up(&mut self, angle: f32) {
        if self.enable_rotate && angle.is_finite() {
            self.delta_phi -= angle;
        }
    }

    /// Move toward the target; `factor` > 1 shrinks the distance by that ratio.
    pub fn dolly_in(&mut self, factor: f32) {
        if self.enable_zoom && factor.is_finite() && factor > 0.0 {
            self.scale /= factor;
        }
    }

    pub fn dolly_out(&mut self, factor: f32) {
        if self.enable_zoom && factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Slide camera and target along the camera's screen-space right/up axes.
    pub fn pan(&mut self, right: f32, up: f32) {
        if self.enable_pan && right.is_finite() && up.is_finite() {
            self.pan_right += right;
            self.pan_up += up;
        }
    }

    pub fn has_pending_motion(&self) -> bool {
        self.delta_theta.abs() > SETTLE_EPSILON
            || self.delta_phi.abs() > SETTLE_EPSILON
            || (self.scale - 1.0).abs() > SETTLE_EPSILON
            || self.pan_right.abs() > SETTLE_EPSILON
            || self.pan_up.abs() > SETTLE_EPSILON
    }

    fn clear_pending(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_right = 0.0;
        self.pan_up = 0.0;
    }

    fn apply_pending(&mut self, camera: &mut dyn OrientedCamera) {
        let step = if self.enable_damping {
            self.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };

        if self.pan_right != 0.0 || self.pan_up != 0.0 {
            let forward = camera.look_direction();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();
            let shift = (right * self.pan_right + up * self.pan_up) * step;
            self.target += shift;
            camera.set_position(camera.position() + shift);
        }

        let offset = camera.position() - self.target;
        let radius = offset.length();
        if radius > 0.0 {
            let mut theta = offset.x.atan2(offset.z);
            let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

            theta += self.delta_theta * step;
            phi += self.delta_phi * step;
            let min_phi = self.min_polar_angle.max(POLE_EPSILON);
            let max_phi = self.max_polar_angle.min(PI - POLE_EPSILON);
            phi = phi.clamp(min_phi, max_phi.max(min_phi));

            // Scale is applied whole; dolly steps are discrete.
            let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

            let (sin_phi, cos_phi) = phi.sin_cos();
            let (sin_theta, cos_theta) = theta.sin_cos();
            let offset = Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * radius;
            camera.set_position(self.target + offset);
        }

        if self.enable_damping {
            let decay = 1.0 - step;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_right *= decay;
            self.pan_up *= decay;
            self.scale = 1.0;
            if !self.has_pending_motion() {
                self.clear_pending();
            }
        } else {
            self.clear_pending();
        }
    }
}

impl FollowTarget for OrbitControls {
    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn update(&mut self, camera: &mut dyn OrientedCamera) -> bool {
        let changed = self.has_pending_motion();
        if changed {
            self.apply_pending(camera);
        } else {
            self.clear_pending();
        }
        camera.look_at(self.target);
        changed
    }
}
