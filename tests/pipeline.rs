//! End-to-end tests: landmarks in, particle buffers out.
//!
//! Hands are synthesized with the same [`SimulatedHand`] the binary uses
//! without a camera, so the real classifier runs on every frame.

use gesture_particles::color::FIST_RED;
use gesture_particles::input::SimulatedHand;
use gesture_particles::tracking::{parse_recording, HandTracker, ReplayTracker};
use gesture_particles::{Config, HandLandmarks, Session, ShapeSpec};

fn config() -> Config {
    Config {
        particle_count: 500,
        ..Config::default()
    }
}

fn hand(fingers: u8) -> HandLandmarks {
    SimulatedHand {
        fingers,
        ..Default::default()
    }
    .landmarks()
    .unwrap()
}

fn fist() -> HandLandmarks {
    SimulatedHand {
        fist: true,
        ..Default::default()
    }
    .landmarks()
    .unwrap()
}

fn max_target_radius(session: &Session) -> f32 {
    session
        .field()
        .targets()
        .iter()
        .map(|t| t.length())
        .fold(0.0, f32::max)
}

// ============================================================================
// Gesture scenarios
// ============================================================================

#[test]
fn test_heart_then_fist_then_release() {
    let mut session = Session::with_seed(config(), 7);
    assert_eq!(session.state().effective_shape(), ShapeSpec::Sphere(12.0));

    // One finger selects the heart
    assert_eq!(session.observe(Some(&hand(1))), Some(ShapeSpec::Heart(0.8)));
    assert_eq!(session.retarget_count(), 1);

    // Holding it does nothing more
    assert_eq!(session.observe(Some(&hand(1))), None);
    assert_eq!(session.retarget_count(), 1);

    // Fist collapses everything to the origin and turns it red
    assert_eq!(session.observe(Some(&fist())), Some(ShapeSpec::Collapsed));
    assert!(session.field().targets().iter().all(|t| *t == glam::Vec3::ZERO));
    session.tick();
    assert!(session.field().colors().iter().all(|c| *c == FIST_RED));

    // A held fist does not retarget again
    assert_eq!(session.observe(Some(&fist())), None);

    // Opening the hand restores the selected shape
    assert_eq!(session.observe(Some(&hand(1))), Some(ShapeSpec::Heart(0.8)));
    session.tick();
    assert!(session.field().colors().iter().all(|c| *c != FIST_RED));
    assert_eq!(session.retarget_count(), 3);
}

#[test]
fn test_each_count_retargets_once() {
    let mut session = Session::with_seed(config(), 8);
    for fingers in [3, 3, 3, 2, 2, 2] {
        session.observe(Some(&hand(fingers)));
    }
    assert_eq!(session.state().target_shape, ShapeSpec::Saturn);
    assert_eq!(session.retarget_count(), 2);
}

#[test]
fn test_missing_hand_keeps_shape() {
    let mut session = Session::with_seed(config(), 9);
    session.observe(Some(&hand(2)));
    let targets = session.field().targets().to_vec();

    for i in 0..20 {
        if i % 2 == 0 {
            session.observe(None);
        } else {
            session.observe(Some(&hand(2)));
        }
    }

    assert_eq!(session.retarget_count(), 1);
    assert_eq!(session.field().targets(), &targets[..]);
}

#[test]
fn test_open_hand_at_start_does_not_retarget() {
    let mut session = Session::with_seed(config(), 10);
    session.observe(Some(&hand(5)));
    session.observe(Some(&hand(4)));
    assert_eq!(session.retarget_count(), 0);
}

// ============================================================================
// Motion
// ============================================================================

#[test]
fn test_particles_close_in_on_targets() {
    let mut session = Session::with_seed(config(), 11);
    session.observe(Some(&hand(1)));

    let distance = |s: &Session| -> f32 {
        let scale = s.state().pinch_scale;
        s.field()
            .positions()
            .iter()
            .zip(s.field().targets())
            .map(|(p, t)| (*t * scale - *p).length())
            .fold(0.0, f32::max)
    };

    let mut last = distance(&session);
    for _ in 0..50 {
        session.tick();
        let now = distance(&session);
        assert!(now <= last + 1e-4, "distance grew from {} to {}", last, now);
        last = now;
    }

    for _ in 0..250 {
        session.tick();
    }
    assert!(distance(&session) < 1e-3);
}

#[test]
fn test_pinch_scales_the_shape() {
    let mut session = Session::with_seed(config(), 12);
    let wide = SimulatedHand {
        fingers: 5,
        pinch: 2.0,
        ..Default::default()
    }
    .landmarks()
    .unwrap();

    for _ in 0..200 {
        session.observe(Some(&wide));
    }
    let scale = session.state().pinch_scale;
    assert!((scale - 2.0).abs() < 1e-2, "pinch scale {}", scale);

    for _ in 0..400 {
        session.tick();
    }
    let radius = session
        .field()
        .positions()
        .iter()
        .map(|p| p.length())
        .fold(0.0, f32::max);
    assert!((radius - 12.0 * scale).abs() < 1e-2, "radius {}", radius);
}

#[test]
fn test_targets_stay_within_shape_bounds() {
    let mut session = Session::with_seed(config(), 13);

    session.observe(Some(&hand(2)));
    assert!(max_target_radius(&session) <= 15.01);

    session.observe(Some(&hand(3)));
    assert!(max_target_radius(&session) <= 18.2);

    session.observe(Some(&hand(5)));
    assert!(session
        .field()
        .targets()
        .iter()
        .all(|t| (t.length() - 12.0).abs() < 1e-3));
}

#[test]
fn test_rotation_idles_without_a_hand() {
    let mut session = Session::with_seed(config(), 14);
    for _ in 0..100 {
        session.observe(None);
        session.tick();
    }
    let rotation = session.rotation();
    assert!((rotation.yaw - 0.2).abs() < 1e-4);
    assert_eq!(rotation.pitch, 0.0);
    assert_eq!(session.tick_count(), 100);
}

// ============================================================================
// Replay
// ============================================================================

fn recording_line(hand: Option<&HandLandmarks>) -> String {
    match hand {
        None => "null".to_string(),
        Some(hand) => {
            let points: Vec<[f32; 3]> = hand.points().iter().map(|p| [p.x, p.y, p.z]).collect();
            serde_json::to_string(&points).unwrap()
        }
    }
}

#[test]
fn test_replayed_recording_drives_session() {
    let text = [
        recording_line(Some(&hand(1))),
        recording_line(None),
        recording_line(Some(&hand(1))),
        recording_line(Some(&hand(2))),
    ]
    .join("\n");

    let frames = parse_recording(text.as_bytes()).unwrap();
    let mut tracker = ReplayTracker::new(frames, 0.0, false);
    let mut session = Session::with_seed(config(), 15);

    let mut retargets = Vec::new();
    while let Some(observation) = tracker.next_observation() {
        if let Some(shape) = session.observe(observation.as_ref()) {
            retargets.push(shape);
        }
        session.tick();
    }

    assert_eq!(retargets, vec![ShapeSpec::Heart(0.8), ShapeSpec::Saturn]);
}
