//! Keyboard and touch input buffering
//!
//! Hosts feed raw key codes (DOM `KeyboardEvent.code` names) and touch
//! button state in whenever events arrive. The engine reads everything once
//! per tick through [`InputState::snapshot_and_consume`].
//!
//! Held controls are level-triggered. Jump and the three attacks are
//! edge-triggered: a press latches a flag that is cleared by the tick that
//! reads it, so several presses between two ticks collapse into one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Logical game controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Left,
    Right,
    Crouch,
    Jump,
    Sprint,
    Punch,
    Kick,
    Special,
}

impl Control {
    /// Map a key code to its control. Bindings are fixed.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "ArrowLeft" | "KeyA" => Control::Left,
            "ArrowRight" | "KeyD" => Control::Right,
            "ArrowDown" | "KeyS" => Control::Crouch,
            "Space" | "KeyW" | "ArrowUp" => Control::Jump,
            "ShiftLeft" | "ShiftRight" => Control::Sprint,
            "KeyJ" | "KeyZ" => Control::Punch,
            "KeyK" | "KeyX" => Control::Kick,
            "KeyL" | "KeyC" => Control::Special,
            _ => return None,
        })
    }

    /// Whether a press fires once rather than acting while held
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            Control::Jump | Control::Punch | Control::Kick | Control::Special
        )
    }
}

/// Pending edge presses not yet seen by a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Latches {
    jump: bool,
    punch: bool,
    kick: bool,
    special: bool,
}

impl Latches {
    fn set(&mut self, control: Control) {
        match control {
            Control::Jump => self.jump = true,
            Control::Punch => self.punch = true,
            Control::Kick => self.kick = true,
            Control::Special => self.special = true,
            _ => {}
        }
    }
}

/// Buffered input for one engine
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Key codes currently held down
    keys: HashSet<String>,
    /// On-screen buttons currently held down
    touch: HashSet<Control>,
    latches: Latches,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true if the code is bound.
    ///
    /// A repeat for a key that is already down (OS auto-repeat) does not
    /// latch a new edge.
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(control) = Control::from_code(code) else {
            return false;
        };
        let fresh = self.keys.insert(code.to_owned());
        if fresh && control.is_edge() {
            self.latches.set(control);
        }
        true
    }

    /// Record a key release. Returns true if the code is bound.
    pub fn key_up(&mut self, code: &str) -> bool {
        if Control::from_code(code).is_none() {
            return false;
        }
        self.keys.remove(code);
        true
    }

    /// Touch button pressed
    pub fn touch_start(&mut self, control: Control) {
        if self.touch.insert(control) && control.is_edge() {
            self.latches.set(control);
        }
    }

    /// Touch button released
    pub fn touch_end(&mut self, control: Control) {
        self.touch.remove(&control);
    }

    /// Whether any key or touch button for `control` is down
    pub fn is_held(&self, control: Control) -> bool {
        self.touch.contains(&control)
            || self
                .keys
                .iter()
                .any(|code| Control::from_code(code) == Some(control))
    }

    /// Build this tick's input and clear the edge latches
    pub fn snapshot_and_consume(&mut self) -> TickInput {
        let latches = std::mem::take(&mut self.latches);
        TickInput {
            left: self.is_held(Control::Left),
            right: self.is_held(Control::Right),
            sprint: self.is_held(Control::Sprint),
            crouch: self.is_held(Control::Crouch),
            jump: latches.jump,
            punch: latches.punch,
            kick: latches.kick,
            special: latches.special,
        }
    }

    /// Drop all held keys, touches and pending edges
    pub fn clear(&mut self) {
        self.keys.clear();
        self.touch.clear();
        self.latches = Latches::default();
    }
}
