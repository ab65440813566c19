//! Interaction state shared by the observation and tick handlers.
//!
//! The observation handler owns the gesture-derived fields and the tick
//! handler owns the hue phase. Both receive the state by `&mut`, so the
//! single-writer rule is checked by the borrow checker instead of a lock.

use crate::color::wrap_unit;
use crate::config::Config;
use crate::gesture::{GestureSignal, PINCH_MAX, PINCH_MIN};
use crate::shape::ShapeSpec;
use glam::Vec2;

/// Live interaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    /// Shape picked by the last finger count. Kept while a fist is held.
    pub target_shape: ShapeSpec,
    /// Wrist offset in `[-1, 1]`, decaying toward zero with no hand.
    pub hand_offset: Vec2,
    /// Smoothed pinch scale in `[0.1, 3.0]`.
    pub pinch_scale: f32,
    /// Whether the last observed hand was a fist.
    pub is_fist: bool,
    /// Hue phase in `[0, 1)`.
    pub hue_phase: f32,
}

impl InteractionState {
    pub fn new(initial_shape: ShapeSpec) -> Self {
        Self {
            target_shape: initial_shape,
            hand_offset: Vec2::ZERO,
            pinch_scale: 1.0,
            is_fist: false,
            hue_phase: 0.0,
        }
    }

    /// Shape the particles should currently be heading for.
    pub fn effective_shape(&self) -> ShapeSpec {
        if self.is_fist {
            ShapeSpec::Collapsed
        } else {
            self.target_shape
        }
    }

    /// Fold one observation into the state.
    ///
    /// Returns the shape to retarget to when the selected shape or the fist
    /// flag changed, `None` otherwise. A missing hand never retargets.
    pub fn observe(&mut self, signal: Option<&GestureSignal>, config: &Config) -> Option<ShapeSpec> {
        let Some(signal) = signal else {
            self.hand_offset *= config.offset_decay;
            return None;
        };

        self.hand_offset = signal.hand_offset_raw;

        let target = signal.pinch_raw.clamp(PINCH_MIN, PINCH_MAX);
        self.pinch_scale += (target - self.pinch_scale) * config.pinch_smoothing;
        self.pinch_scale = self.pinch_scale.clamp(PINCH_MIN, PINCH_MAX);

        let fist_toggled = signal.is_fist != self.is_fist;
        self.is_fist = signal.is_fist;

        let mut shape_changed = false;
        if !signal.is_fist {
            if let Some(shape) = shape_for_fingers(signal.fingers_up, config) {
                if shape != self.target_shape {
                    self.target_shape = shape;
                    shape_changed = true;
                }
            }
        }

        if fist_toggled || shape_changed {
            Some(self.effective_shape())
        } else {
            None
        }
    }

    /// Advance the hue phase by `speed`, wrapping into `[0, 1)` for either sign.
    pub fn advance_hue(&mut self, speed: f32) {
        self.hue_phase = wrap_unit(self.hue_phase + speed);
    }
}

/// Shape selected by a finger count. Zero fingers is a fist and selects nothing.
pub fn shape_for_fingers(fingers_up: u8, config: &Config) -> Option<ShapeSpec> {
    match fingers_up {
        0 => None,
        1 => Some(config.heart()),
        2 => Some(ShapeSpec::Saturn),
        3 => Some(ShapeSpec::Flower),
        _ => Some(config.sphere()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(fingers_up: u8) -> GestureSignal {
        GestureSignal {
            extended: [false; 5],
            fingers_up,
            is_fist: fingers_up == 0,
            pinch_raw: 1.0,
            hand_offset_raw: Vec2::new(0.4, -0.2),
        }
    }

    fn state() -> InteractionState {
        InteractionState::new(Config::default().sphere())
    }

    #[test]
    fn test_finger_mapping() {
        let config = Config::default();
        assert_eq!(shape_for_fingers(0, &config), None);
        assert_eq!(shape_for_fingers(1, &config), Some(ShapeSpec::Heart(0.8)));
        assert_eq!(shape_for_fingers(2, &config), Some(ShapeSpec::Saturn));
        assert_eq!(shape_for_fingers(3, &config), Some(ShapeSpec::Flower));
        assert_eq!(shape_for_fingers(4, &config), Some(ShapeSpec::Sphere(12.0)));
        assert_eq!(shape_for_fingers(5, &config), Some(ShapeSpec::Sphere(12.0)));
    }

    #[test]
    fn test_retarget_only_on_change() {
        let config = Config::default();
        let mut s = state();
        assert_eq!(s.observe(Some(&signal(3)), &config), Some(ShapeSpec::Flower));
        assert_eq!(s.observe(Some(&signal(2)), &config), Some(ShapeSpec::Saturn));
        assert_eq!(s.observe(Some(&signal(2)), &config), None);
        // Already a sphere from the start
        let mut s = state();
        assert_eq!(s.observe(Some(&signal(5)), &config), None);
    }

    #[test]
    fn test_missing_hand_keeps_shape_and_decays_offset() {
        let config = Config::default();
        let mut s = state();
        s.observe(Some(&signal(3)), &config);
        for _ in 0..10 {
            assert_eq!(s.observe(None, &config), None);
        }
        assert_eq!(s.target_shape, ShapeSpec::Flower);
        let expected = Vec2::new(0.4, -0.2) * 0.95f32.powi(10);
        assert!((s.hand_offset - expected).length() < 1e-5);
    }

    #[test]
    fn test_fist_collapses_and_release_restores() {
        let config = Config::default();
        let mut s = state();
        s.observe(Some(&signal(1)), &config);
        assert_eq!(s.observe(Some(&signal(0)), &config), Some(ShapeSpec::Collapsed));
        assert_eq!(s.target_shape, ShapeSpec::Heart(0.8));
        assert_eq!(s.effective_shape(), ShapeSpec::Collapsed);
        // Holding the fist does not resample again
        assert_eq!(s.observe(Some(&signal(0)), &config), None);
        // Opening the same hand again goes back to the stored shape
        assert_eq!(s.observe(Some(&signal(1)), &config), Some(ShapeSpec::Heart(0.8)));
    }

    #[test]
    fn test_pinch_is_smoothed() {
        let config = Config::default();
        let mut s = state();
        let mut sig = signal(5);
        sig.pinch_raw = 3.0;
        s.observe(Some(&sig), &config);
        assert!((s.pinch_scale - 1.2).abs() < 1e-5);
        for _ in 0..200 {
            s.observe(Some(&sig), &config);
        }
        assert!((s.pinch_scale - 3.0).abs() < 1e-3);
        assert!(s.pinch_scale <= PINCH_MAX);
    }

    #[test]
    fn test_hue_wraps_both_ways() {
        let mut s = state();
        s.hue_phase = 0.998;
        s.advance_hue(0.005);
        assert!((s.hue_phase - 0.003).abs() < 1e-5);
        s.advance_hue(-0.01);
        assert!((s.hue_phase - 0.993).abs() < 1e-5);
        assert!(s.hue_phase >= 0.0 && s.hue_phase < 1.0);
    }
}
