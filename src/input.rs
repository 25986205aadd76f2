//! Host input to movement intents
//!
//! Keyboard holds, on-screen buttons, taps and touch drags all reduce to an
//! [`InputIntent`] that the frame step consumes once per frame.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Platform-independent input for one frame step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Held left
    pub move_left: bool,
    /// Held right
    pub move_right: bool,
    /// Fire once (edge-triggered)
    pub fire: bool,
    /// Absolute ship x from a pointer drag (clamped by the step)
    pub absolute_x: Option<f32>,
}

/// Logical key a host key name maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Fire,
}

impl Key {
    /// Map a DOM-style key name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Space" | "Spacebar" => Some(Key::Fire),
            _ => None,
        }
    }
}

/// Key name as tracked while held. Letters fold to lowercase so a key
/// released with Shift down matches its unshifted press.
fn held_name(name: &str) -> String {
    if name.chars().count() == 1 {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

/// Accumulates raw input between frames
#[derive(Debug, Clone)]
pub struct InputAdapter {
    /// Movement key names currently held
    held: HashSet<String>,
    /// On-screen hold buttons
    button_left: bool,
    button_right: bool,
    fire_queued: bool,
    pointer_x: Option<f32>,
    /// Half-width a normalized pointer position maps onto
    pointer_span: f32,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(crate::tuning::Tuning::default().pointer_span)
    }
}

impl InputAdapter {
    pub fn new(pointer_span: f32) -> Self {
        Self {
            held: HashSet::new(),
            button_left: false,
            button_right: false,
            fire_queued: false,
            pointer_x: None,
            pointer_span,
        }
    }

    /// Key pressed. Returns true if the key is bound.
    ///
    /// Every key-down of the fire key (auto-repeat included) queues a shot.
    pub fn key_down(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(Key::Fire) => {
                self.fire_queued = true;
                true
            }
            Some(Key::Left | Key::Right) => {
                self.held.insert(held_name(name));
                true
            }
            None => false,
        }
    }

    /// Key released. Returns true if the key is bound.
    pub fn key_up(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(_) => {
                self.held.remove(&held_name(name));
                true
            }
            None => false,
        }
    }

    /// On-screen left button
    pub fn set_left(&mut self, pressed: bool) {
        self.button_left = pressed;
    }

    /// On-screen right button
    pub fn set_right(&mut self, pressed: bool) {
        self.button_right = pressed;
    }

    /// Tap anywhere to fire
    pub fn tap(&mut self) {
        self.fire_queued = true;
    }

    /// Touch began. Only single-finger touches fire.
    pub fn touch_start(&mut self, touch_count: u32) {
        if touch_count == 1 {
            self.fire_queued = true;
        }
    }

    /// Single-finger drag: the ship follows the finger across the viewport
    pub fn touch_move(&mut self, client_x: f32, viewport_width: f32, touch_count: u32) {
        if touch_count != 1 || !(viewport_width > 0.0) || !client_x.is_finite() {
            return;
        }
        let normalized = (client_x / viewport_width) * 2.0 - 1.0;
        self.pointer_x = Some(normalized * self.pointer_span);
    }

    fn holding(&self, key: Key) -> bool {
        self.held.iter().any(|name| Key::from_name(name) == Some(key))
    }

    /// Intent for the next step. Consumes the queued shot and pointer position.
    pub fn take_intent(&mut self) -> InputIntent {
        InputIntent {
            move_left: self.button_left || self.holding(Key::Left),
            move_right: self.button_right || self.holding(Key::Right),
            fire: std::mem::take(&mut self.fire_queued),
            absolute_x: self.pointer_x.take(),
        }
    }

    /// Forget all held and queued input
    pub fn clear(&mut self) {
        self.held.clear();
        self.button_left = false;
        self.button_right = false;
        self.fire_queued = false;
        self.pointer_x = None;
    }
}
