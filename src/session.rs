//! The interaction-to-geometry pipeline as one owned context.
//!
//! A [`Session`] holds the interaction state, the particle field, the
//! animation driver and the RNG. The host calls [`Session::observe`] once per
//! tracking result and [`Session::tick`] once per display refresh, always
//! from the same thread.
//!
//! ```ignore
//! let mut session = Session::new(Config::default());
//! session.observe(Some(&hand));
//! session.tick();
//! session.present(&mut renderer)?;
//! ```

use crate::config::Config;
use crate::driver::{AnimationDriver, Frame, FrameSink, Rotation};
use crate::error::LandmarkError;
use crate::field::ParticleField;
use crate::gesture::{GestureClassifier, GestureSignal};
use crate::landmarks::{HandLandmarks, Landmark};
use crate::shape::ShapeSpec;
use crate::state::InteractionState;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub struct Session {
    config: Config,
    classifier: GestureClassifier,
    state: InteractionState,
    field: ParticleField,
    driver: AnimationDriver,
    rng: SmallRng,
    last_signal: Option<GestureSignal>,
    retargets: u64,
}

impl Session {
    /// Seed a new session from OS entropy.
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Seed a new session deterministically.
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, mut rng: SmallRng) -> Self {
        let initial = config.sphere();
        let mut field = ParticleField::new(
            config.particle_count as usize,
            config.spawn_extent,
            config.lerp_speed,
            &mut rng,
        );
        field.retarget(initial, &mut rng);

        log::info!(
            "Session started: {} particles, initial shape {}",
            field.len(),
            initial
        );

        Self {
            classifier: GestureClassifier::from_config(&config),
            state: InteractionState::new(initial),
            driver: AnimationDriver::new(&config),
            field,
            rng,
            config,
            last_signal: None,
            retargets: 0,
        }
    }

    /// Observation handler.
    ///
    /// Classifies the hand (if any), updates the interaction state and
    /// resamples all targets when the effective shape changed. Returns the
    /// shape retargeted to, if any.
    pub fn observe(&mut self, hand: Option<&HandLandmarks>) -> Option<ShapeSpec> {
        let signal = self.classifier.classify(hand);
        if let Some(s) = &signal {
            log::debug!(
                "Observed hand: {} fingers, fist={}, pinch={:.2}",
                s.fingers_up,
                s.is_fist,
                s.pinch_raw
            );
        }
        self.last_signal = signal;

        let retarget = self.state.observe(signal.as_ref(), &self.config)?;
        self.field.retarget(retarget, &mut self.rng);
        self.retargets += 1;
        log::info!("Retargeted to {}", retarget);
        Some(retarget)
    }

    /// Observation handler for raw landmark slices.
    ///
    /// A malformed frame is rejected before it touches any state.
    pub fn observe_raw(&mut self, points: Option<&[Landmark]>) -> Result<Option<ShapeSpec>, LandmarkError> {
        let hand = points
            .map(HandLandmarks::from_slice)
            .transpose()
            .inspect_err(|e| log::warn!("Rejected landmark frame: {}", e))?;
        Ok(self.observe(hand.as_ref()))
    }

    /// Tick handler. Advances hue, particles and rotation.
    pub fn tick(&mut self) -> Rotation {
        self.driver.tick(&mut self.state, &mut self.field)
    }

    /// Hand the current buffers to a renderer and clear the dirty flags.
    pub fn present<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        let dirty = self.field.take_dirty();
        let frame = Frame {
            field: &self.field,
            rotation: self.driver.rotation(),
            dirty,
        };
        sink.present(&frame)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn rotation(&self) -> Rotation {
        self.driver.rotation()
    }

    /// Gesture read from the most recent observation.
    pub fn last_signal(&self) -> Option<&GestureSignal> {
        self.last_signal.as_ref()
    }

    /// Retargets triggered by observations (the startup bind is not counted).
    pub fn retarget_count(&self) -> u64 {
        self.retargets
    }

    pub fn tick_count(&self) -> u64 {
        self.driver.ticks()
    }
}
