use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, NativeKeyCode, PhysicalKey};
use winit::window::Window;

use crate::input::{ButtonAction, InputEvent, Key, MouseButton};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events the input subsystem does not track
/// (close requests and resizes are handled by the window system itself).
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => Some(InputEvent::Key {
            key: map_key(event.physical_key),
            action: key_action(event),
        }),

        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
            button: map_mouse_button(*button),
            action: element_action(*state),
        }),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical(*position, window.scale_factor());
            Some(InputEvent::CursorMoved { x, y })
        }

        _ => None,
    }
}

/// Physical pixels from winit; the input API reports logical coordinates.
fn to_logical(position: PhysicalPosition<f64>, scale_factor: f64) -> (f64, f64) {
    let logical = position.to_logical::<f64>(scale_factor);
    (logical.x, logical.y)
}

fn key_action(event: &KeyEvent) -> ButtonAction {
    match (event.state, event.repeat) {
        (ElementState::Pressed, true) => ButtonAction::Repeat,
        (state, _) => element_action(state),
    }
}

fn element_action(state: ElementState) -> ButtonAction {
    match state {
        ElementState::Pressed => ButtonAction::Press,
        ElementState::Released => ButtonAction::Release,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    let code = match pk {
        PhysicalKey::Code(code) => code,
        PhysicalKey::Unidentified(native) => return Key::Native(native_code(native)),
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::NumpadEnter => Key::NumpadEnter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::ShiftRight => Key::ShiftRight,
        KeyCode::ControlLeft => Key::ControlLeft,
        KeyCode::ControlRight => Key::ControlRight,
        KeyCode::AltLeft => Key::AltLeft,
        KeyCode::AltRight => Key::AltRight,
        KeyCode::SuperLeft => Key::MetaLeft,
        KeyCode::SuperRight => Key::MetaRight,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        other => Key::Unknown(other as u32),
    }
}

/// Raw scancode for keys winit could not identify; 0 when the platform gives none.
fn native_code(native: NativeKeyCode) -> u32 {
    match native {
        NativeKeyCode::Android(c) | NativeKeyCode::Xkb(c) => c,
        NativeKeyCode::MacOS(c) | NativeKeyCode::Windows(c) => u32::from(c),
        NativeKeyCode::Unidentified => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputFrame, InputState};

    fn code(c: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(c)
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn named_keys_map_to_their_variants() {
        assert_eq!(map_key(code(KeyCode::Escape)), Key::Escape);
        assert_eq!(map_key(code(KeyCode::KeyW)), Key::W);
        assert_eq!(map_key(code(KeyCode::Digit7)), Key::Digit7);
        assert_eq!(map_key(code(KeyCode::F12)), Key::F12);
        assert_eq!(map_key(code(KeyCode::ArrowLeft)), Key::ArrowLeft);
    }

    #[test]
    fn left_and_right_modifiers_stay_distinct() {
        let pairs = [
            (KeyCode::ShiftLeft, KeyCode::ShiftRight),
            (KeyCode::ControlLeft, KeyCode::ControlRight),
            (KeyCode::AltLeft, KeyCode::AltRight),
            (KeyCode::SuperLeft, KeyCode::SuperRight),
            (KeyCode::Enter, KeyCode::NumpadEnter),
        ];
        for (a, b) in pairs {
            assert_ne!(map_key(code(a)), map_key(code(b)), "{a:?} and {b:?}");
        }
    }

    #[test]
    fn releasing_one_shift_keeps_the_other_held() {
        let left = map_key(code(KeyCode::ShiftLeft));
        let right = map_key(code(KeyCode::ShiftRight));

        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for (key, action) in [
            (left, ButtonAction::Press),
            (right, ButtonAction::Press),
            (left, ButtonAction::Release),
        ] {
            state.apply_event(&mut frame, InputEvent::Key { key, action });
        }

        assert!(!state.key_down(left));
        assert!(state.key_down(right));
    }

    #[test]
    fn unmapped_and_unidentified_keys_do_not_collide() {
        let unmapped = map_key(code(KeyCode::Backquote));
        let native = map_key(PhysicalKey::Unidentified(NativeKeyCode::Xkb(
            KeyCode::Backquote as u32,
        )));

        assert!(matches!(unmapped, Key::Unknown(_)));
        assert_eq!(native, Key::Native(KeyCode::Backquote as u32));
        assert_ne!(unmapped, native);
    }

    #[test]
    fn native_scancodes_are_preserved() {
        assert_eq!(
            map_key(PhysicalKey::Unidentified(NativeKeyCode::Windows(0x5b))),
            Key::Native(0x5b)
        );
        assert_eq!(
            map_key(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            Key::Native(0)
        );
    }

    // ── buttons and actions ───────────────────────────────────────────────

    #[test]
    fn mouse_buttons_map_one_to_one() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(map_mouse_button(WinitMouseButton::Right), MouseButton::Right);
        assert_eq!(map_mouse_button(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(map_mouse_button(WinitMouseButton::Back), MouseButton::Back);
        assert_eq!(map_mouse_button(WinitMouseButton::Forward), MouseButton::Forward);
        assert_eq!(map_mouse_button(WinitMouseButton::Other(9)), MouseButton::Other(9));
    }

    #[test]
    fn element_state_maps_to_press_and_release() {
        assert_eq!(element_action(ElementState::Pressed), ButtonAction::Press);
        assert_eq!(element_action(ElementState::Released), ButtonAction::Release);
    }

    // ── cursor ────────────────────────────────────────────────────────────

    #[test]
    fn cursor_is_scaled_to_logical_pixels() {
        assert_eq!(to_logical(PhysicalPosition::new(300.0, 150.0), 2.0), (150.0, 75.0));
        assert_eq!(to_logical(PhysicalPosition::new(42.0, 7.0), 1.0), (42.0, 7.0));
    }
}
