//! Per-tick orchestration.
//!
//! Each tick advances the hue, moves the particles, accumulates the whole
//! set's rotation and then hands a [`Frame`] to whatever presents it.

use crate::config::Config;
use crate::field::{DirtyFlags, ParticleField};
use crate::shape::ShapeSpec;
use crate::state::InteractionState;
use glam::{EulerRot, Mat4};

/// Rigid rotation applied to the whole particle set, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    /// Around Y. Unbounded accumulator.
    pub yaw: f32,
    /// Around X. Unbounded accumulator.
    pub pitch: f32,
    /// Around Z.
    pub roll: f32,
}

impl Rotation {
    /// Model matrix, pitch applied outermost (XYZ Euler order).
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.pitch, self.yaw, self.roll)
    }
}

/// Everything a renderer needs for one tick.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub field: &'a ParticleField,
    pub rotation: Rotation,
    /// Buffers touched since the previous frame.
    pub dirty: DirtyFlags,
}

/// Presentation backend.
///
/// Implemented by the GPU renderer; tests use a recorder.
pub trait FrameSink {
    type Error;

    fn present(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}

/// Tick handler: hue, particle motion and rotation.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    rotation: Rotation,
    color_speed: f32,
    idle_yaw: f32,
    hand_rotation_gain: f32,
    saturn_roll: f32,
    roll_decay: f32,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(config: &Config) -> Self {
        Self {
            rotation: Rotation::default(),
            color_speed: config.color_speed,
            idle_yaw: config.idle_yaw,
            hand_rotation_gain: config.hand_rotation_gain,
            saturn_roll: config.saturn_roll,
            roll_decay: config.roll_decay,
            ticks: 0,
        }
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Number of ticks run so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick and return the updated rotation.
    pub fn tick(&mut self, state: &mut InteractionState, field: &mut ParticleField) -> Rotation {
        state.advance_hue(self.color_speed);
        field.advance(state);

        let offset = state.hand_offset;
        self.rotation.yaw += self.idle_yaw + offset.x * self.hand_rotation_gain;
        self.rotation.pitch += offset.y * self.hand_rotation_gain;

        // Tilt the ring only while Saturn is the selected shape
        if state.target_shape == ShapeSpec::Saturn {
            self.rotation.roll += (self.saturn_roll - self.rotation.roll) * (1.0 - self.roll_decay);
        } else {
            self.rotation.roll *= self.roll_decay;
        }

        self.ticks += 1;
        self.rotation
    }
}
