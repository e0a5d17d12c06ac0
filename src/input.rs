//! Latest-input snapshot.
//!
//! Browser event callbacks only record into [`InputState`]; the frame loop reads
//! it at tick boundaries and turns it into flight [`Controls`]. Later events
//! simply overwrite earlier ones.

use std::collections::HashSet;

use glam::Vec2;

use crate::config::Tuning;
use crate::flight::Controls;

/// Touches left of this fraction of the screen width steer left, right of
/// `1 - TOUCH_STEER_ZONE` steer right.
const TOUCH_STEER_ZONE: f32 = 0.40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    TurnLeft,
    TurnRight,
    Throttle,
}

impl Key {
    /// Map a `KeyboardEvent.code`.
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "KeyA" => Some(Key::TurnLeft),
            "KeyD" => Some(Key::TurnRight),
            "KeyW" => Some(Key::Throttle),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    held: HashSet<Key>,
    /// Average touch position normalized to the viewport, `None` when no finger is down.
    touch: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: Key, down: bool) {
        if down {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn set_touch(&mut self, touch: Option<Vec2>) {
        self.touch = touch;
    }

    pub fn touch(&self) -> Option<Vec2> {
        self.touch
    }

    /// Steering and throttle for this frame.
    pub fn controls(&self, tuning: &Tuning) -> Controls {
        let full = tuning.turn_rate;
        let mut turn = 0.0;
        let mut throttle = 0.0;

        if self.is_held(Key::TurnLeft) {
            turn -= full;
        }
        if self.is_held(Key::TurnRight) {
            turn += full;
        }

        if let Some(touch) = self.touch {
            if touch.x < TOUCH_STEER_ZONE {
                turn -= full * (1.0 - touch.x / TOUCH_STEER_ZONE);
            }
            if touch.x > 1.0 - TOUCH_STEER_ZONE {
                turn += full * (touch.x - (1.0 - TOUCH_STEER_ZONE)) / TOUCH_STEER_ZONE;
            }
            throttle = touch.y;
        }

        if self.is_held(Key::Throttle) {
            throttle = 1.0;
        }

        Controls {
            turn,
            throttle: throttle.clamp(0.0, 1.0),
        }
    }
}
