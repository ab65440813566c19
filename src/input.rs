//! Keyboard and mouse input, and a simulated hand driven by it.
//!
//! Without a camera, [`SimulatedHand`] stands in for the tracking model: it
//! builds a full 21-point landmark set from the keyboard and mouse so the
//! real classifier runs on it.
//!
//! | Input | Effect |
//! |---|---|
//! | `0`–`5` | Raise that many fingers (`0` is a fist) |
//! | `F` | Toggle fist |
//! | `H` | Hide/show the hand (no detection while hidden) |
//! | Mouse | Move the wrist |
//! | Scroll | Open/close the thumb-index pinch |

use crate::landmarks::*;
use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the visualizer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Key0, Key1, Key2, Key3, Key4, Key5,
    F, H,
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Digit0 | WinitKeyCode::Numpad0 => KeyCode::Key0,
            WinitKeyCode::Digit1 | WinitKeyCode::Numpad1 => KeyCode::Key1,
            WinitKeyCode::Digit2 | WinitKeyCode::Numpad2 => KeyCode::Key2,
            WinitKeyCode::Digit3 | WinitKeyCode::Numpad3 => KeyCode::Key3,
            WinitKeyCode::Digit4 | WinitKeyCode::Numpad4 => KeyCode::Key4,
            WinitKeyCode::Digit5 | WinitKeyCode::Numpad5 => KeyCode::Key5,
            WinitKeyCode::KeyF => KeyCode::F,
            WinitKeyCode::KeyH => KeyCode::H,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

const DIGIT_KEYS: [KeyCode; 6] = [
    KeyCode::Key0,
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
];

/// Input state tracking for keyboard and mouse.
///
/// Tracks both instantaneous events (pressed this frame) and continuous
/// state (currently held).
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    mouse_ndc: Vec2,
    scroll_delta: f32,

    window_size: (u32, u32),
}

impl Input {
    pub fn new() -> Self {
        Self {
            window_size: (1280, 720),
            ..Default::default()
        }
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Mouse position in normalized device coordinates (-1 to 1), y up.
    pub fn mouse_ndc(&self) -> Vec2 {
        self.mouse_ndc
    }

    /// Scroll wheel delta this frame. Positive is up/forward.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Clear per-frame state. Call after the frame has consumed its input.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.scroll_delta = 0.0;
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    match event.state {
                        ElementState::Pressed => {
                            // No key repeat
                            if !self.keys_held.contains(&key) {
                                self.keys_pressed.insert(key);
                            }
                            self.keys_held.insert(key);
                        }
                        ElementState::Released => {
                            self.keys_held.remove(&key);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (w, h) = self.window_size;
                if w > 0 && h > 0 {
                    self.mouse_ndc = Vec2::new(
                        (position.x as f32 / w as f32) * 2.0 - 1.0,
                        1.0 - (position.y as f32 / h as f32) * 2.0,
                    );
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }

            _ => {}
        }
    }
}

/// Horizontal column of each non-thumb digit relative to the wrist.
const FINGER_COLUMNS: [f32; 4] = [-0.03, 0.0, 0.03, 0.06];
/// Digits in the order they are raised: index, middle, ring, pinky, thumb.
const RAISE_ORDER: [usize; 5] = [1, 2, 3, 4, 0];

/// Keyboard/mouse driven stand-in for a tracked hand.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedHand {
    /// Raised digits, 0 to 5.
    pub fingers: u8,
    /// Fist overrides the finger count.
    pub fist: bool,
    /// Whether the tracker "sees" the hand.
    pub visible: bool,
    /// Target pinch scale (thumb-index distance times 5).
    pub pinch: f32,
    /// Wrist in image coordinates, `[0, 1]`, y down.
    pub wrist: Vec2,
}

impl Default for SimulatedHand {
    fn default() -> Self {
        Self {
            fingers: 5,
            fist: false,
            visible: true,
            pinch: 1.0,
            wrist: Vec2::new(0.5, 0.5),
        }
    }
}

impl SimulatedHand {
    /// Apply this frame's input.
    pub fn update(&mut self, input: &Input) {
        for (n, key) in DIGIT_KEYS.iter().enumerate() {
            if input.key_pressed(*key) {
                self.fingers = n as u8;
                self.fist = false;
            }
        }
        if input.key_pressed(KeyCode::F) {
            self.fist = !self.fist;
        }
        if input.key_pressed(KeyCode::H) {
            self.visible = !self.visible;
            log::info!("Simulated hand {}", if self.visible { "shown" } else { "hidden" });
        }

        let ndc = input.mouse_ndc();
        self.wrist = Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5);
        self.pinch = (self.pinch + input.scroll_delta() * 0.1).clamp(0.1, 3.0);
    }

    /// Which digits are extended, thumb first.
    pub fn extended(&self) -> [bool; 5] {
        let mut extended = [false; 5];
        if !self.fist {
            for &digit in RAISE_ORDER.iter().take(self.fingers.min(5) as usize) {
                extended[digit] = true;
            }
        }
        extended
    }

    /// Synthesize the landmark set, or `None` while hidden.
    pub fn landmarks(&self) -> Option<HandLandmarks> {
        if !self.visible {
            return None;
        }

        let extended = self.extended();
        let (wx, wy) = (self.wrist.x, self.wrist.y);
        let mut p = [Landmark::new(wx, wy, 0.0); LANDMARK_COUNT];

        // Four fingers: MCP, PIP, DIP, TIP stacked upward (y decreasing) when
        // extended, with DIP and TIP folded back below the PIP when curled.
        for (finger, &column) in FINGER_COLUMNS.iter().enumerate() {
            let mcp = INDEX_MCP + finger * 4;
            let x = wx + column;
            let (dip, tip) = if extended[finger + 1] { (0.18, 0.22) } else { (0.12, 0.10) };
            p[mcp] = Landmark::new(x, wy - 0.10, 0.0);
            p[mcp + 1] = Landmark::new(x, wy - 0.14, 0.0);
            p[mcp + 2] = Landmark::new(x, wy - dip, 0.0);
            p[mcp + 3] = Landmark::new(x, wy - tip, 0.0);
        }

        // Thumb spreads sideways, away from the pinky base
        let thumb_x = if extended[0] { wx - 0.18 } else { wx + 0.02 };
        p[THUMB_CMC] = Landmark::new(wx - 0.03, wy - 0.02, 0.0);
        p[THUMB_MCP] = Landmark::new((wx - 0.03 + thumb_x) * 0.5, wy - 0.05, 0.0);
        p[THUMB_IP] = Landmark::new(thumb_x, wy - 0.07, 0.0);

        // Thumb tip level with the index tip, then the index tip slides
        // sideways so the pair sits exactly `pinch / 5` apart. Only its x
        // moves, so the index stays extended or curled as set above.
        let tip_y = p[INDEX_TIP].y;
        p[THUMB_TIP] = Landmark::new(thumb_x, tip_y, 0.0);
        p[INDEX_TIP] = Landmark::new(thumb_x + self.pinch / 5.0, tip_y, 0.0);

        HandLandmarks::new(p).ok()
    }
}
