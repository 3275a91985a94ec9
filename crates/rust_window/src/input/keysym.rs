//! X11 keysym table
//!
//! The X11 backend lowercases keysyms with `XConvertCase` before looking them
//! up, so letters are only listed in their lowercase form. Generic modifiers
//! (`Shift`, `Control`, `Alt`) have no keysym of their own; querying them
//! checks both sided keysyms.

use super::KeyCode;

const XK_SPACE: u32 = 0x0020;
const XK_0: u32 = 0x0030;
const XK_LOWER_A: u32 = 0x0061;
const XK_BACKSPACE: u32 = 0xff08;
const XK_TAB: u32 = 0xff09;
const XK_RETURN: u32 = 0xff0d;
const XK_PAUSE: u32 = 0xff13;
const XK_SCROLL_LOCK: u32 = 0xff14;
const XK_ESCAPE: u32 = 0xff1b;
const XK_HOME: u32 = 0xff50;
const XK_LEFT: u32 = 0xff51;
const XK_UP: u32 = 0xff52;
const XK_RIGHT: u32 = 0xff53;
const XK_DOWN: u32 = 0xff54;
const XK_PRIOR: u32 = 0xff55;
const XK_NEXT: u32 = 0xff56;
const XK_END: u32 = 0xff57;
const XK_PRINT: u32 = 0xff61;
const XK_INSERT: u32 = 0xff63;
const XK_NUM_LOCK: u32 = 0xff7f;
const XK_KP_MULTIPLY: u32 = 0xffaa;
const XK_KP_ADD: u32 = 0xffab;
const XK_KP_SEPARATOR: u32 = 0xffac;
const XK_KP_SUBTRACT: u32 = 0xffad;
const XK_KP_DECIMAL: u32 = 0xffae;
const XK_KP_DIVIDE: u32 = 0xffaf;
const XK_KP_0: u32 = 0xffb0;
const XK_F1: u32 = 0xffbe;
const XK_SHIFT_L: u32 = 0xffe1;
const XK_SHIFT_R: u32 = 0xffe2;
const XK_CONTROL_L: u32 = 0xffe3;
const XK_CONTROL_R: u32 = 0xffe4;
const XK_CAPS_LOCK: u32 = 0xffe5;
const XK_ALT_L: u32 = 0xffe9;
const XK_ALT_R: u32 = 0xffea;
const XK_SUPER_L: u32 = 0xffeb;
const XK_SUPER_R: u32 = 0xffec;
const XK_DELETE: u32 = 0xffff;

const PAIRS: &[(u32, KeyCode)] = &[
    (XK_SPACE, KeyCode::Space),
    (XK_BACKSPACE, KeyCode::Backspace),
    (XK_TAB, KeyCode::Tab),
    (XK_RETURN, KeyCode::Enter),
    (XK_PAUSE, KeyCode::Pause),
    (XK_SCROLL_LOCK, KeyCode::ScrollLock),
    (XK_ESCAPE, KeyCode::Escape),
    (XK_HOME, KeyCode::Home),
    (XK_LEFT, KeyCode::Left),
    (XK_UP, KeyCode::Up),
    (XK_RIGHT, KeyCode::Right),
    (XK_DOWN, KeyCode::Down),
    (XK_PRIOR, KeyCode::PageUp),
    (XK_NEXT, KeyCode::PageDown),
    (XK_END, KeyCode::End),
    (XK_PRINT, KeyCode::PrintScreen),
    (XK_INSERT, KeyCode::Insert),
    (XK_NUM_LOCK, KeyCode::NumLock),
    (XK_KP_MULTIPLY, KeyCode::NumpadMultiply),
    (XK_KP_ADD, KeyCode::NumpadAdd),
    (XK_KP_SEPARATOR, KeyCode::NumpadSeparator),
    (XK_KP_SUBTRACT, KeyCode::NumpadSubtract),
    (XK_KP_DECIMAL, KeyCode::NumpadDecimal),
    (XK_KP_DIVIDE, KeyCode::NumpadDivide),
    (XK_SHIFT_L, KeyCode::LeftShift),
    (XK_SHIFT_R, KeyCode::RightShift),
    (XK_CONTROL_L, KeyCode::LeftControl),
    (XK_CONTROL_R, KeyCode::RightControl),
    (XK_CAPS_LOCK, KeyCode::CapsLock),
    (XK_ALT_L, KeyCode::LeftAlt),
    (XK_ALT_R, KeyCode::RightAlt),
    (XK_SUPER_L, KeyCode::SuperLeft),
    (XK_SUPER_R, KeyCode::SuperRight),
    (XK_DELETE, KeyCode::Delete),
];

/// Map a (lowercased) keysym onto a [`KeyCode`]
pub fn to_key_code(keysym: u32) -> KeyCode {
    match keysym {
        k if (XK_0..XK_0 + 10).contains(&k) => KeyCode::DIGITS[(k - XK_0) as usize],
        k if (XK_LOWER_A..XK_LOWER_A + 26).contains(&k) => {
            KeyCode::LETTERS[(k - XK_LOWER_A) as usize]
        }
        k if (XK_KP_0..XK_KP_0 + 10).contains(&k) => KeyCode::NUMPAD_DIGITS[(k - XK_KP_0) as usize],
        k if (XK_F1..XK_F1 + 12).contains(&k) => KeyCode::FUNCTION_KEYS[(k - XK_F1) as usize],
        k => PAIRS
            .iter()
            .find(|(sym, _)| *sym == k)
            .map_or(KeyCode::Unknown(k), |(_, key)| *key),
    }
}

/// Keysyms whose keys count as `key` being held
///
/// Empty for mouse buttons, which the keyboard map cannot answer for.
pub fn from_key_code(key: KeyCode) -> Vec<u32> {
    let indexed = |table: &[KeyCode], base: u32| {
        table.iter().position(|k| *k == key).map(|i| base + i as u32)
    };

    match key {
        KeyCode::Shift => vec![XK_SHIFT_L, XK_SHIFT_R],
        KeyCode::Control => vec![XK_CONTROL_L, XK_CONTROL_R],
        KeyCode::Alt => vec![XK_ALT_L, XK_ALT_R],
        KeyCode::Unknown(raw) => vec![raw],
        _ => indexed(&KeyCode::DIGITS, XK_0)
            .or_else(|| indexed(&KeyCode::LETTERS, XK_LOWER_A))
            .or_else(|| indexed(&KeyCode::NUMPAD_DIGITS, XK_KP_0))
            .or_else(|| indexed(&KeyCode::FUNCTION_KEYS, XK_F1))
            .or_else(|| PAIRS.iter().find(|(_, k)| *k == key).map(|(sym, _)| *sym))
            .into_iter()
            .collect(),
    }
}

/// Mouse button reported by an X11 button number; scroll buttons 4-7 are not buttons
pub const fn button_to_key_code(button: u32) -> Option<KeyCode> {
    match button {
        1 => Some(KeyCode::MouseLeft),
        2 => Some(KeyCode::MouseMiddle),
        3 => Some(KeyCode::MouseRight),
        8 => Some(KeyCode::MouseX1),
        9 => Some(KeyCode::MouseX2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_letters_and_digits() {
        assert_eq!(to_key_code(u32::from(b'a')), KeyCode::A);
        assert_eq!(to_key_code(u32::from(b'z')), KeyCode::Z);
        assert_eq!(to_key_code(u32::from(b'5')), KeyCode::Key5);
    }

    #[test]
    fn test_function_and_keypad() {
        assert_eq!(to_key_code(0xffbe), KeyCode::F1);
        assert_eq!(to_key_code(0xffc9), KeyCode::F12);
        assert_eq!(to_key_code(0xffb9), KeyCode::Numpad9);
        assert_eq!(to_key_code(0xff1b), KeyCode::Escape);
    }

    #[test]
    fn test_generic_modifiers_query_both_sides() {
        assert_eq!(from_key_code(KeyCode::Shift), vec![0xffe1, 0xffe2]);
        assert_eq!(from_key_code(KeyCode::LeftControl), vec![0xffe3]);
    }

    #[test]
    fn test_mouse_buttons_have_no_keysym() {
        assert!(from_key_code(KeyCode::MouseLeft).is_empty());
    }

    #[test]
    fn test_named_keys_map_back() {
        for (sym, key) in PAIRS {
            assert_eq!(to_key_code(*sym), *key);
            assert_eq!(from_key_code(*key), vec![*sym]);
        }
        assert_eq!(from_key_code(KeyCode::Q), vec![u32::from(b'q')]);
    }

    #[test]
    fn test_button_numbers() {
        assert_eq!(button_to_key_code(1), Some(KeyCode::MouseLeft));
        assert_eq!(button_to_key_code(3), Some(KeyCode::MouseRight));
        assert_eq!(button_to_key_code(4), None);
        assert_eq!(button_to_key_code(9), Some(KeyCode::MouseX2));
    }
}
