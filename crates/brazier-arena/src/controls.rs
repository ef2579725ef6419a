use brazier_battle::Action;
use brazier_engine::input::{InputState, Key};

/// What a key press means outside of the fight itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    Quit,
    Restart,
}

const LEFT: &[Key] = &[Key::A, Key::ArrowLeft];
const RIGHT: &[Key] = &[Key::D, Key::ArrowRight];
const JUMP: &[Key] = &[Key::W, Key::ArrowUp];
const ATTACK: &[Key] = &[Key::Space];

pub fn bindings(action: Action) -> &'static [Key] {
    match action {
        Action::Left => LEFT,
        Action::Right => RIGHT,
        Action::Jump => JUMP,
        Action::Attack => ATTACK,
    }
}

pub fn action_for(key: Key) -> Option<Action> {
    [Action::Left, Action::Right, Action::Jump, Action::Attack]
        .into_iter()
        .find(|a| bindings(*a).contains(&key))
}

pub fn command_for(key: Key) -> Option<Command> {
    match key {
        Key::Escape => Some(Command::Quit),
        Key::Enter => Some(Command::Restart),
        _ => None,
    }
}

/// Whether any key bound to `action` is held.
///
/// Two keys share each movement action, so releasing one must not drop the
/// action while the other is still down.
pub fn is_held(input: &InputState, action: Action) -> bool {
    bindings(action).iter().any(|k| input.key_down(*k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brazier_engine::input::{InputEvent, KeyState};

    fn press(input: &mut InputState, key: Key) {
        input.apply_event(&InputEvent::Key {
            key,
            state: KeyState::Pressed,
            repeat: false,
        });
    }

    fn release(input: &mut InputState, key: Key) {
        input.apply_event(&InputEvent::Key {
            key,
            state: KeyState::Released,
            repeat: false,
        });
    }

    // ── mapping ─────────────────────────────────────────────────────────

    #[test]
    fn letters_and_arrows_map_to_movement() {
        assert_eq!(action_for(Key::A), Some(Action::Left));
        assert_eq!(action_for(Key::ArrowLeft), Some(Action::Left));
        assert_eq!(action_for(Key::D), Some(Action::Right));
        assert_eq!(action_for(Key::ArrowRight), Some(Action::Right));
        assert_eq!(action_for(Key::W), Some(Action::Jump));
        assert_eq!(action_for(Key::ArrowUp), Some(Action::Jump));
        assert_eq!(action_for(Key::Space), Some(Action::Attack));
    }

    #[test]
    fn unbound_keys_map_to_nothing() {
        assert_eq!(action_for(Key::Q), None);
        assert_eq!(action_for(Key::Unknown(7)), None);
        assert_eq!(command_for(Key::Space), None);
    }

    #[test]
    fn escape_quits_and_enter_restarts() {
        assert_eq!(command_for(Key::Escape), Some(Command::Quit));
        assert_eq!(command_for(Key::Enter), Some(Command::Restart));
    }

    // ── held state ──────────────────────────────────────────────────────

    #[test]
    fn action_stays_held_while_any_binding_is_down() {
        let mut input = InputState::default();
        press(&mut input, Key::A);
        press(&mut input, Key::ArrowLeft);
        release(&mut input, Key::A);
        assert!(is_held(&input, Action::Left));

        release(&mut input, Key::ArrowLeft);
        assert!(!is_held(&input, Action::Left));
    }
}
