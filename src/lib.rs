//! # Gesture Particles
//!
//! A hand-gesture controlled particle visualizer. A tracked hand picks the
//! shape a cloud of particles flows into, pinches to scale it, makes a fist
//! to collapse it and steers its rotation with the wrist.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gesture_particles::prelude::*;
//!
//! let mut session = Session::new(Config::default());
//!
//! // Once per tracking result (a hand, or `None` when none is visible)
//! session.observe(Some(&hand));
//!
//! // Once per display refresh
//! session.tick();
//! session.present(&mut renderer)?;
//! ```
//!
//! ## Pipeline
//!
//! 1. [`gesture`] reads 21 hand landmarks into a [`GestureSignal`]: digits
//!    extended, fist, pinch distance and wrist offset.
//! 2. [`state`] folds signals into the [`InteractionState`] and decides
//!    whether the effective shape changed.
//! 3. On a change, [`field`] resamples every particle's target from
//!    [`shape`].
//! 4. Each tick, [`driver`] advances the hue, moves particles toward their
//!    scaled targets, recolors them and updates the rotation.
//! 5. A [`FrameSink`] (the wgpu renderer in [`gpu`]) draws the buffers.
//!
//! ## Gestures
//!
//! | Fingers up | Shape |
//! |---|---|
//! | 1 | Heart |
//! | 2 | Saturn |
//! | 3 | Flower |
//! | 4 or 5 | Sphere |
//! | fist | Collapse to a point, red |
//!
//! A frame with no hand leaves the shape as it is.
//!
//! ## Hand sources
//!
//! Without a camera, the binary drives the classifier with a keyboard and
//! mouse [`SimulatedHand`](input::SimulatedHand). A recorded landmark
//! stream can be replayed on a tracker thread with
//! [`ReplayTracker`](tracking::ReplayTracker).

pub mod app;
pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod gesture;
pub mod gpu;
pub mod input;
pub mod landmarks;
pub mod session;
pub mod shape;
pub mod state;
pub mod tracking;

pub use app::run;
pub use config::{Config, TrackerConfig};
pub use driver::{AnimationDriver, Frame, FrameSink, Rotation};
pub use error::{AppError, ConfigError, GpuError, LandmarkError, TrackingError};
pub use field::{DirtyFlags, Particle, ParticleField};
pub use gesture::{GestureClassifier, GestureSignal};
pub use glam::{Vec2, Vec3};
pub use landmarks::{HandLandmarks, Landmark};
pub use session::Session;
pub use shape::ShapeSpec;
pub use state::InteractionState;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use gesture_particles::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, TrackerConfig};
    pub use crate::driver::{Frame, FrameSink, Rotation};
    pub use crate::landmarks::{HandLandmarks, Landmark};
    pub use crate::session::Session;
    pub use crate::shape::ShapeSpec;
    pub use crate::tracking::{spawn_tracker, HandTracker, Observation, ReplayTracker};
    pub use glam::{Vec2, Vec3};
}
