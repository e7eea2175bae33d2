//! Narrow capability handles the character controls mutate each frame.
//!
//! Conventions: right-handed, +Y up. A heading of 0 faces -Z, and positive
//! headings turn counter-clockwise seen from above (toward -X).

use glam::{Quat, Vec3};

/// Something with a world position and orientation: the character model.
pub trait MovablePose {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
}

/// A camera the controls can translate and read a yaw from.
pub trait OrientedCamera {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    /// Unit vector the camera is looking along.
    fn look_direction(&self) -> Vec3;
    fn look_at(&mut self, target: Vec3);

    /// Heading of the horizontal part of the look direction. Falls back to 0
    /// when looking straight up or down.
    fn yaw(&self) -> f32 {
        heading_of(self.look_direction()).unwrap_or(0.0)
    }
}

/// The look-at point of an orbit-style camera rig.
pub trait FollowTarget {
    fn target(&self) -> Vec3;
    fn set_target(&mut self, target: Vec3);
    /// Apply pending rig state (user orbiting, damping) to the camera. Returns
    /// true if the camera position changed.
    fn update(&mut self, camera: &mut dyn OrientedCamera) -> bool;
}

/// Unit forward vector on the ground plane for a heading.
pub fn heading_forward(heading: f32) -> Vec3 {
    let (sin, cos) = heading.sin_cos();
    Vec3::new(-sin, 0.0, -cos)
}

/// Inverse of [`heading_forward`]; `None` for vectors with no horizontal part.
pub fn heading_of(direction: Vec3) -> Option<f32> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= 1e-12 {
        return None;
    }
    Some((-flat.x).atan2(-flat.z))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

impl MovablePose for Transform {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

/// Camera that only tracks where it is and which way it looks.
pub struct LookAtCamera {
    pub position: Vec3,
    forward: Vec3,
}

impl LookAtCamera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            forward: Vec3::NEG_Z,
        };
        camera.look_at(target);
        camera
    }
}

impl OrientedCamera for LookAtCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn look_direction(&self) -> Vec3 {
        self.forward
    }

    /// Keeps the previous direction if `target` coincides with the camera.
    fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.forward = dir;
        }
    }
}

impl<T: MovablePose + ?Sized> MovablePose for &mut T {
    fn position(&self) -> Vec3 {
        (**self).position()
    }

    fn set_position(&mut self, position: Vec3) {
        (**self).set_position(position);
    }

    fn rotation(&self) -> Quat {
        (**self).rotation()
    }

    fn set_rotation(&mut self, rotation: Quat) {
        (**self).set_rotation(rotation);
    }
}

impl<T: OrientedCamera + ?Sized> OrientedCamera for &mut T {
    fn position(&self) -> Vec3 {
        (**self).position()
    }

    fn set_position(&mut self, position: Vec3) {
        (**self).set_position(position);
    }

    fn look_direction(&self) -> Vec3 {
        (**self).look_direction()
    }

    fn look_at(&mut self, target: Vec3) {
        (**self).look_at(target);
    }

    fn yaw(&self) -> f32 {
        (**self).yaw()
    }
}

impl<T: FollowTarget + ?Sized> FollowTarget for &mut T {
    fn target(&self) -> Vec3 {
        (**self).target()
    }

    fn set_target(&mut self, target: Vec3) {
        (**self).set_target(target);
    }

    fn update(&mut self, camera: &mut dyn OrientedCamera) -> bool {
        (**self).update(camera)
    }
}
