/// Keyboard key identifier.
///
/// One identifier per physical key: left and right modifiers and the keypad
/// Enter stay distinct. Recognized keys without a variant use `Unknown`;
/// keys the platform could not identify use `Native` with the raw scancode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    NumpadEnter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    MetaLeft,
    MetaRight,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Key the platform recognized but that has no variant above.
    Unknown(u32),

    /// Key the platform could not identify, by raw native scancode.
    Native(u32),
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Transition carried by a key or mouse-button event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonAction {
    Press,
    Release,
    /// OS auto-repeat while held. Not an edge; input state ignores it.
    Repeat,
}

/// Raw input event as delivered by a window system during `poll_events`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, action: ButtonAction },
    MouseButton { button: MouseButton, action: ButtonAction },
    /// Absolute cursor position in logical window coordinates.
    CursorMoved { x: f64, y: f64 },
}
