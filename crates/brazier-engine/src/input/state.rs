use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState};

/// Held-key state for the window.
///
/// The runtime applies every translated event here before forwarding it to
/// the app, so the app can tell real transitions from OS key-repeat.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Keys currently held.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event and reports whether it changed the held state.
    ///
    /// Repeats and releases of keys that were never seen pressed report `false`.
    /// Losing focus clears every held key (no stuck keys after alt-tab).
    pub fn apply_event(&mut self, ev: &InputEvent) -> bool {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    let had_keys = !self.keys_down.is_empty();
                    self.keys_down.clear();
                    return had_keys;
                }
                false
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => self.keys_down.insert(*key),
                KeyState::Released => self.keys_down.remove(key),
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn press_then_repeat_reports_one_transition() {
        let mut s = InputState::default();
        assert!(s.apply_event(&key(Key::Space, KeyState::Pressed, false)));
        assert!(!s.apply_event(&key(Key::Space, KeyState::Pressed, true)));
        assert!(s.key_down(Key::Space));
    }

    #[test]
    fn release_of_unheld_key_is_ignored() {
        let mut s = InputState::default();
        assert!(!s.apply_event(&key(Key::A, KeyState::Released, false)));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut s = InputState::default();
        s.apply_event(&key(Key::D, KeyState::Pressed, false));
        assert!(s.apply_event(&InputEvent::Focused(false)));
        assert!(!s.key_down(Key::D));
        assert!(!s.focused);
    }
}
