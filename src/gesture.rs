//! Gesture classification.
//!
//! Turns one frame's [`HandLandmarks`] into a [`GestureSignal`]: how many
//! fingers are raised, whether the hand is a fist, how far apart thumb and
//! index tips are, and where the wrist sits on screen.
//!
//! The classifier itself is stateless. Temporal smoothing of the continuous
//! signals happens in [`InteractionState`](crate::state::InteractionState).

use crate::config::Config;
use crate::landmarks::*;
use glam::Vec2;

/// Smallest pinch scale.
pub const PINCH_MIN: f32 = 0.1;
/// Largest pinch scale.
pub const PINCH_MAX: f32 = 3.0;

/// (tip, joint) pairs for the four non-thumb digits. A digit is extended
/// when its tip is above the joint in image space.
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Gesture read from a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSignal {
    /// Extended digits, thumb first.
    pub extended: [bool; 5],
    /// Number of extended digits, 0 to 5.
    pub fingers_up: u8,
    /// No digit extended.
    pub is_fist: bool,
    /// Thumb-index distance times the pinch gain, clamped to `[0.1, 3.0]`.
    pub pinch_raw: f32,
    /// Wrist position in `[-1, 1]`, y pointing up.
    pub hand_offset_raw: Vec2,
}

/// Stateless landmark-to-gesture mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureClassifier {
    /// Horizontal thumb-tip to pinky-base distance that counts as extended.
    pub thumb_threshold: f32,
    /// Multiplier from normalized thumb-index distance to pinch scale.
    pub pinch_gain: f32,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self {
            thumb_threshold: 0.2,
            pinch_gain: 5.0,
        }
    }
}

impl GestureClassifier {
    pub fn from_config(config: &Config) -> Self {
        Self {
            thumb_threshold: config.thumb_threshold,
            pinch_gain: config.pinch_gain,
        }
    }

    /// Classify one frame. `None` in means no hand was detected, and gives `None` out.
    pub fn classify(&self, hand: Option<&HandLandmarks>) -> Option<GestureSignal> {
        hand.map(|h| self.classify_hand(h))
    }

    /// Classify a detected hand.
    pub fn classify_hand(&self, hand: &HandLandmarks) -> GestureSignal {
        let mut extended = [false; 5];

        // The thumb folds sideways, so compare horizontal spread against the
        // pinky base instead of a vertical joint test. Tolerates hand roll.
        extended[0] = (hand[THUMB_TIP].x - hand[PINKY_MCP].x).abs() > self.thumb_threshold;
        for (slot, &(tip, joint)) in extended[1..].iter_mut().zip(FINGER_JOINTS.iter()) {
            *slot = hand[tip].y < hand[joint].y;
        }

        let fingers_up = extended.iter().filter(|&&e| e).count() as u8;

        GestureSignal {
            extended,
            fingers_up,
            is_fist: fingers_up == 0,
            pinch_raw: self.pinch_scale(hand),
            hand_offset_raw: hand_offset(hand),
        }
    }

    fn pinch_scale(&self, hand: &HandLandmarks) -> f32 {
        let distance = hand[INDEX_TIP].xy().distance(hand[THUMB_TIP].xy());
        (distance * self.pinch_gain).clamp(PINCH_MIN, PINCH_MAX)
    }
}

/// Wrist position mapped from image space `[0, 1]` to `[-1, 1]`, y flipped to point up.
///
/// x is taken as the tracker reports it, not mirrored. With a selfie camera
/// image, moving the hand toward the user's right gives a negative x and
/// turns the set the other way. Mirror the landmarks upstream for
/// mirror-style control.
fn hand_offset(hand: &HandLandmarks) -> Vec2 {
    let wrist = hand.wrist();
    Vec2::new((wrist.x - 0.5) * 2.0, -(wrist.y - 0.5) * 2.0).clamp(Vec2::NEG_ONE, Vec2::ONE)
}
