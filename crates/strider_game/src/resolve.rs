//! Pressed keys -> camera-relative movement intent.
//!
//! Each axis is resolved on its own: holding both keys of an opposing pair
//! (forward+back, left+right) cancels that axis. Forward/back is evaluated
//! first, then left/right, and the two signed axes index the 8-way table. When
//! both axes cancel or are idle the character is not moving, so `w+s` is idle,
//! `w+s+a` strafes left and `w+a+d` walks straight ahead.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use strider_core::input::{Key, KeySet};

use crate::config::KeyBindings;

/// Eight planar directions relative to the camera's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    ForwardLeft,
    Left,
    BackLeft,
    Back,
    BackRight,
    Right,
    ForwardRight,
}

impl Direction {
    /// Heading offset from camera yaw, radians, counter-clockwise positive.
    pub fn offset(self) -> f32 {
        match self {
            Self::Forward => 0.0,
            Self::ForwardLeft => FRAC_PI_4,
            Self::Left => FRAC_PI_2,
            Self::BackLeft => FRAC_PI_2 + FRAC_PI_4,
            Self::Back => PI,
            Self::BackRight => -(FRAC_PI_2 + FRAC_PI_4),
            Self::Right => -FRAC_PI_2,
            Self::ForwardRight => -FRAC_PI_4,
        }
    }

    /// `forward` is +1 forward / -1 back, `side` is +1 left / -1 right.
    pub fn from_axes(forward: i8, side: i8) -> Option<Direction> {
        match (forward.signum(), side.signum()) {
            (1, 0) => Some(Self::Forward),
            (1, 1) => Some(Self::ForwardLeft),
            (1, -1) => Some(Self::ForwardRight),
            (-1, 0) => Some(Self::Back),
            (-1, 1) => Some(Self::BackLeft),
            (-1, -1) => Some(Self::BackRight),
            (0, 1) => Some(Self::Left),
            (0, -1) => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    Walk,
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub direction: Option<Direction>,
    pub gait: Gait,
}

impl MoveIntent {
    pub fn is_moving(&self) -> bool {
        self.direction.is_some()
    }

    pub fn offset(&self) -> Option<f32> {
        self.direction.map(Direction::offset)
    }
}

pub fn resolve_intent(keys: &KeySet, bindings: &KeyBindings, run_toggle: bool) -> MoveIntent {
    let held = |group: &[Key]| i8::from(keys.contains_any(group));
    let forward = held(&bindings.forward) - held(&bindings.back);
    let side = held(&bindings.left) - held(&bindings.right);

    MoveIntent {
        direction: Direction::from_axes(forward, side),
        gait: if run_toggle { Gait::Run } else { Gait::Walk },
    }
}
