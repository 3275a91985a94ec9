//! Input vocabulary
//!
//! [`KeyCode`] is the single platform-neutral name for every key and mouse
//! button the library reports. Each native substrate keeps its own lookup
//! table next to this module:
//!
//! - [`virtual_key`]: Win32 virtual-key codes
//! - [`keysym`]: X11 keysyms
//!
//! Both tables are plain data and are compiled on every target so they can be
//! tested anywhere.

pub mod keysym;
pub mod virtual_key;

use std::fmt;

/// Normalized key and mouse button codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// Left mouse button
    MouseLeft,
    /// Right mouse button
    MouseRight,
    /// Middle mouse button
    MouseMiddle,
    /// First extra mouse button (usually "back")
    MouseX1,
    /// Second extra mouse button (usually "forward")
    MouseX2,

    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Enter / Return key
    Enter,
    /// Either shift key
    Shift,
    /// Either control key
    Control,
    /// Either alt key
    Alt,
    /// Pause key
    Pause,
    /// Caps lock key
    CapsLock,
    /// Escape key
    Escape,
    /// Space bar
    Space,
    /// Page up key
    PageUp,
    /// Page down key
    PageDown,
    /// End key
    End,
    /// Home key
    Home,
    /// Left arrow key
    Left,
    /// Up arrow key
    Up,
    /// Right arrow key
    Right,
    /// Down arrow key
    Down,
    /// Print screen key
    PrintScreen,
    /// Insert key
    Insert,
    /// Delete key
    Delete,

    /// 0 key on the main row
    Key0,
    /// 1 key on the main row
    Key1,
    /// 2 key on the main row
    Key2,
    /// 3 key on the main row
    Key3,
    /// 4 key on the main row
    Key4,
    /// 5 key on the main row
    Key5,
    /// 6 key on the main row
    Key6,
    /// 7 key on the main row
    Key7,
    /// 8 key on the main row
    Key8,
    /// 9 key on the main row
    Key9,

    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,

    /// Left Windows / Super key
    SuperLeft,
    /// Right Windows / Super key
    SuperRight,

    /// Numpad 0
    Numpad0,
    /// Numpad 1
    Numpad1,
    /// Numpad 2
    Numpad2,
    /// Numpad 3
    Numpad3,
    /// Numpad 4
    Numpad4,
    /// Numpad 5
    Numpad5,
    /// Numpad 6
    Numpad6,
    /// Numpad 7
    Numpad7,
    /// Numpad 8
    Numpad8,
    /// Numpad 9
    Numpad9,
    /// Numpad `*`
    NumpadMultiply,
    /// Numpad `+`
    NumpadAdd,
    /// Numpad separator
    NumpadSeparator,
    /// Numpad `-`
    NumpadSubtract,
    /// Numpad `.`
    NumpadDecimal,
    /// Numpad `/`
    NumpadDivide,

    /// F1 key
    F1,
    /// F2 key
    F2,
    /// F3 key
    F3,
    /// F4 key
    F4,
    /// F5 key
    F5,
    /// F6 key
    F6,
    /// F7 key
    F7,
    /// F8 key
    F8,
    /// F9 key
    F9,
    /// F10 key
    F10,
    /// F11 key
    F11,
    /// F12 key
    F12,

    /// Num lock key
    NumLock,
    /// Scroll lock key
    ScrollLock,
    /// Left shift key
    LeftShift,
    /// Right shift key
    RightShift,
    /// Left control key
    LeftControl,
    /// Right control key
    RightControl,
    /// Left alt key
    LeftAlt,
    /// Right alt key (AltGr on some layouts)
    RightAlt,

    /// A native code with no normalized name; carries the raw code
    Unknown(u32),
}

impl KeyCode {
    /// Letter keys in alphabetical order
    pub const LETTERS: [Self; 26] = [
        Self::A, Self::B, Self::C, Self::D, Self::E, Self::F, Self::G,
        Self::H, Self::I, Self::J, Self::K, Self::L, Self::M, Self::N,
        Self::O, Self::P, Self::Q, Self::R, Self::S, Self::T, Self::U,
        Self::V, Self::W, Self::X, Self::Y, Self::Z,
    ];

    /// Main-row digit keys, 0 through 9
    pub const DIGITS: [Self; 10] = [
        Self::Key0, Self::Key1, Self::Key2, Self::Key3, Self::Key4,
        Self::Key5, Self::Key6, Self::Key7, Self::Key8, Self::Key9,
    ];

    /// Numpad digit keys, 0 through 9
    pub const NUMPAD_DIGITS: [Self; 10] = [
        Self::Numpad0, Self::Numpad1, Self::Numpad2, Self::Numpad3, Self::Numpad4,
        Self::Numpad5, Self::Numpad6, Self::Numpad7, Self::Numpad8, Self::Numpad9,
    ];

    /// Function keys, F1 through F12
    pub const FUNCTION_KEYS: [Self; 12] = [
        Self::F1, Self::F2, Self::F3, Self::F4, Self::F5, Self::F6,
        Self::F7, Self::F8, Self::F9, Self::F10, Self::F11, Self::F12,
    ];

    /// Whether this code names a mouse button rather than a key
    pub const fn is_mouse_button(self) -> bool {
        matches!(
            self,
            Self::MouseLeft | Self::MouseRight | Self::MouseMiddle | Self::MouseX1 | Self::MouseX2
        )
    }

    /// Whether this code is a modifier key (generic or sided)
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::Shift
                | Self::Control
                | Self::Alt
                | Self::LeftShift
                | Self::RightShift
                | Self::LeftControl
                | Self::RightControl
                | Self::LeftAlt
                | Self::RightAlt
                | Self::SuperLeft
                | Self::SuperRight
        )
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MouseLeft => "Mouse Left",
            Self::MouseRight => "Mouse Right",
            Self::MouseMiddle => "Mouse Middle",
            Self::MouseX1 => "Mouse X1",
            Self::MouseX2 => "Mouse X2",
            Self::Backspace => "Backspace",
            Self::Tab => "Tab",
            Self::Enter => "Enter",
            Self::Shift => "Shift",
            Self::Control => "Control",
            Self::Alt => "Alt",
            Self::Pause => "Pause",
            Self::CapsLock => "Caps Lock",
            Self::Escape => "Escape",
            Self::Space => "Space",
            Self::PageUp => "Page Up",
            Self::PageDown => "Page Down",
            Self::End => "End",
            Self::Home => "Home",
            Self::Left => "Left",
            Self::Up => "Up",
            Self::Right => "Right",
            Self::Down => "Down",
            Self::PrintScreen => "Print Screen",
            Self::Insert => "Insert",
            Self::Delete => "Delete",
            Self::SuperLeft => "Left Super",
            Self::SuperRight => "Right Super",
            Self::NumpadMultiply => "Numpad *",
            Self::NumpadAdd => "Numpad +",
            Self::NumpadSeparator => "Numpad Separator",
            Self::NumpadSubtract => "Numpad -",
            Self::NumpadDecimal => "Numpad .",
            Self::NumpadDivide => "Numpad /",
            Self::NumLock => "Num Lock",
            Self::ScrollLock => "Scroll Lock",
            Self::LeftShift => "Left Shift",
            Self::RightShift => "Right Shift",
            Self::LeftControl => "Left Control",
            Self::RightControl => "Right Control",
            Self::LeftAlt => "Left Alt",
            Self::RightAlt => "Right Alt",
            Self::Unknown(code) => return write!(f, "Unknown(0x{code:x})"),
            other => {
                // Letters, digits and function keys format from their table position
                if let Some(i) = Self::LETTERS.iter().position(|k| k == other) {
                    return write!(f, "{}", char::from(b'A' + i as u8));
                }
                if let Some(i) = Self::DIGITS.iter().position(|k| k == other) {
                    return write!(f, "{i}");
                }
                if let Some(i) = Self::NUMPAD_DIGITS.iter().position(|k| k == other) {
                    return write!(f, "Numpad {i}");
                }
                if let Some(i) = Self::FUNCTION_KEYS.iter().position(|k| k == other) {
                    return write!(f, "F{}", i + 1);
                }
                return write!(f, "{other:?}");
            }
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(KeyCode::A.to_string(), "A");
        assert_eq!(KeyCode::Z.to_string(), "Z");
        assert_eq!(KeyCode::Key7.to_string(), "7");
        assert_eq!(KeyCode::Numpad3.to_string(), "Numpad 3");
        assert_eq!(KeyCode::F12.to_string(), "F12");
        assert_eq!(KeyCode::Escape.to_string(), "Escape");
        assert_eq!(KeyCode::MouseX2.to_string(), "Mouse X2");
        assert_eq!(KeyCode::Unknown(0xff).to_string(), "Unknown(0xff)");
    }

    #[test]
    fn test_classification() {
        assert!(KeyCode::MouseLeft.is_mouse_button());
        assert!(!KeyCode::A.is_mouse_button());
        assert!(KeyCode::LeftShift.is_modifier());
        assert!(KeyCode::Control.is_modifier());
        assert!(!KeyCode::Space.is_modifier());
    }
}
