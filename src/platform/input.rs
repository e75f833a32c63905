//! Keyboard state
//!
//! Movement keys are level-triggered (held or not); fire is edge-triggered,
//! one shot per physical press with OS auto-repeat ignored.

use crate::settings::{Action, KeyBindings};
use crate::sim::TickInput;

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    bindings: KeyBindings,
    negative_held: bool,
    positive_held: bool,
    fire_presses: u32,
}

impl KeyboardState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    /// Returns true if the key is bound (so the host can suppress scrolling)
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        match self.bindings.action_for(key) {
            Some(Action::MoveNegative) => self.negative_held = true,
            Some(Action::MovePositive) => self.positive_held = true,
            Some(Action::Fire) => {
                if !repeat {
                    self.fire_presses += 1;
                }
            }
            None => return false,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match self.bindings.action_for(key) {
            Some(Action::MoveNegative) => self.negative_held = false,
            Some(Action::MovePositive) => self.positive_held = false,
            Some(Action::Fire) => {}
            None => return false,
        }
        true
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        self.negative_held = false;
        self.positive_held = false;
        self.fire_presses = 0;
    }

    /// Input for the next tick; consumes pending fire presses
    pub fn take_input(&mut self) -> TickInput {
        TickInput {
            move_negative: self.negative_held,
            move_positive: self.positive_held,
            fire_presses: std::mem::take(&mut self.fire_presses),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_persist() {
        let mut keys = KeyboardState::new(KeyBindings::default());
        keys.key_down("q", false);
        assert!(keys.take_input().move_negative);
        assert!(keys.take_input().move_negative);
        keys.key_up("q");
        assert!(!keys.take_input().move_negative);
    }

    #[test]
    fn test_fire_is_edge_triggered() {
        let mut keys = KeyboardState::new(KeyBindings::default());
        keys.key_down(" ", false);
        keys.key_down(" ", true);
        keys.key_down(" ", true);
        assert_eq!(keys.take_input().fire_presses, 1);
        // Consumed
        assert_eq!(keys.take_input().fire_presses, 0);

        keys.key_up(" ");
        keys.key_down(" ", false);
        keys.key_up(" ");
        keys.key_down(" ", false);
        assert_eq!(keys.take_input().fire_presses, 2);
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let mut keys = KeyboardState::new(KeyBindings::default());
        assert!(!keys.key_down("z", false));
        assert!(!keys.key_up("z"));
        assert_eq!(keys.take_input(), TickInput::default());
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut keys = KeyboardState::new(KeyBindings::default());
        keys.key_down("ArrowRight", false);
        keys.key_down(" ", false);
        keys.clear();
        assert_eq!(keys.take_input(), TickInput::default());
    }
}
