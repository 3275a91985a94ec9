//! Win32 virtual-key code table
//!
//! Values are the `VK_*` constants from `winuser.h`. The Win32 backend feeds
//! `WM_KEYDOWN`/`WM_KEYUP` wParams through [`to_key_code`] and asks
//! `GetKeyState` about [`from_key_code`] results.

use super::KeyCode;

const VK_LBUTTON: u16 = 0x01;
const VK_RBUTTON: u16 = 0x02;
const VK_MBUTTON: u16 = 0x04;
const VK_XBUTTON1: u16 = 0x05;
const VK_XBUTTON2: u16 = 0x06;
const VK_BACK: u16 = 0x08;
const VK_TAB: u16 = 0x09;
const VK_RETURN: u16 = 0x0D;
const VK_SHIFT: u16 = 0x10;
const VK_CONTROL: u16 = 0x11;
const VK_MENU: u16 = 0x12;
const VK_PAUSE: u16 = 0x13;
const VK_CAPITAL: u16 = 0x14;
const VK_ESCAPE: u16 = 0x1B;
const VK_SPACE: u16 = 0x20;
const VK_PRIOR: u16 = 0x21;
const VK_NEXT: u16 = 0x22;
const VK_END: u16 = 0x23;
const VK_HOME: u16 = 0x24;
const VK_LEFT: u16 = 0x25;
const VK_UP: u16 = 0x26;
const VK_RIGHT: u16 = 0x27;
const VK_DOWN: u16 = 0x28;
const VK_SNAPSHOT: u16 = 0x2C;
const VK_INSERT: u16 = 0x2D;
const VK_DELETE: u16 = 0x2E;
const VK_0: u16 = 0x30;
const VK_A: u16 = 0x41;
const VK_LWIN: u16 = 0x5B;
const VK_RWIN: u16 = 0x5C;
const VK_NUMPAD0: u16 = 0x60;
const VK_MULTIPLY: u16 = 0x6A;
const VK_ADD: u16 = 0x6B;
const VK_SEPARATOR: u16 = 0x6C;
const VK_SUBTRACT: u16 = 0x6D;
const VK_DECIMAL: u16 = 0x6E;
const VK_DIVIDE: u16 = 0x6F;
const VK_F1: u16 = 0x70;
const VK_NUMLOCK: u16 = 0x90;
const VK_SCROLL: u16 = 0x91;
const VK_LSHIFT: u16 = 0xA0;
const VK_RSHIFT: u16 = 0xA1;
const VK_LCONTROL: u16 = 0xA2;
const VK_RCONTROL: u16 = 0xA3;
const VK_LMENU: u16 = 0xA4;
const VK_RMENU: u16 = 0xA5;

/// Fixed one-to-one pairs; ranges (digits, letters, numpad, F-keys) are handled arithmetically
const PAIRS: &[(u16, KeyCode)] = &[
    (VK_LBUTTON, KeyCode::MouseLeft),
    (VK_RBUTTON, KeyCode::MouseRight),
    (VK_MBUTTON, KeyCode::MouseMiddle),
    (VK_XBUTTON1, KeyCode::MouseX1),
    (VK_XBUTTON2, KeyCode::MouseX2),
    (VK_BACK, KeyCode::Backspace),
    (VK_TAB, KeyCode::Tab),
    (VK_RETURN, KeyCode::Enter),
    (VK_SHIFT, KeyCode::Shift),
    (VK_CONTROL, KeyCode::Control),
    (VK_MENU, KeyCode::Alt),
    (VK_PAUSE, KeyCode::Pause),
    (VK_CAPITAL, KeyCode::CapsLock),
    (VK_ESCAPE, KeyCode::Escape),
    (VK_SPACE, KeyCode::Space),
    (VK_PRIOR, KeyCode::PageUp),
    (VK_NEXT, KeyCode::PageDown),
    (VK_END, KeyCode::End),
    (VK_HOME, KeyCode::Home),
    (VK_LEFT, KeyCode::Left),
    (VK_UP, KeyCode::Up),
    (VK_RIGHT, KeyCode::Right),
    (VK_DOWN, KeyCode::Down),
    (VK_SNAPSHOT, KeyCode::PrintScreen),
    (VK_INSERT, KeyCode::Insert),
    (VK_DELETE, KeyCode::Delete),
    (VK_LWIN, KeyCode::SuperLeft),
    (VK_RWIN, KeyCode::SuperRight),
    (VK_MULTIPLY, KeyCode::NumpadMultiply),
    (VK_ADD, KeyCode::NumpadAdd),
    (VK_SEPARATOR, KeyCode::NumpadSeparator),
    (VK_SUBTRACT, KeyCode::NumpadSubtract),
    (VK_DECIMAL, KeyCode::NumpadDecimal),
    (VK_DIVIDE, KeyCode::NumpadDivide),
    (VK_NUMLOCK, KeyCode::NumLock),
    (VK_SCROLL, KeyCode::ScrollLock),
    (VK_LSHIFT, KeyCode::LeftShift),
    (VK_RSHIFT, KeyCode::RightShift),
    (VK_LCONTROL, KeyCode::LeftControl),
    (VK_RCONTROL, KeyCode::RightControl),
    (VK_LMENU, KeyCode::LeftAlt),
    (VK_RMENU, KeyCode::RightAlt),
];

/// Map a virtual-key code onto a [`KeyCode`]
pub fn to_key_code(vk: u16) -> KeyCode {
    match vk {
        v if (VK_0..VK_0 + 10).contains(&v) => KeyCode::DIGITS[usize::from(v - VK_0)],
        v if (VK_A..VK_A + 26).contains(&v) => KeyCode::LETTERS[usize::from(v - VK_A)],
        v if (VK_NUMPAD0..VK_NUMPAD0 + 10).contains(&v) => {
            KeyCode::NUMPAD_DIGITS[usize::from(v - VK_NUMPAD0)]
        }
        v if (VK_F1..VK_F1 + 12).contains(&v) => KeyCode::FUNCTION_KEYS[usize::from(v - VK_F1)],
        v => PAIRS
            .iter()
            .find(|(code, _)| *code == v)
            .map_or(KeyCode::Unknown(u32::from(v)), |(_, key)| *key),
    }
}

/// Map a [`KeyCode`] back onto its virtual-key code
pub fn from_key_code(key: KeyCode) -> Option<u16> {
    let indexed = |table: &[KeyCode], base: u16| {
        table.iter().position(|k| *k == key).map(|i| base + i as u16)
    };

    if let KeyCode::Unknown(raw) = key {
        return u16::try_from(raw).ok();
    }
    indexed(&KeyCode::DIGITS, VK_0)
        .or_else(|| indexed(&KeyCode::LETTERS, VK_A))
        .or_else(|| indexed(&KeyCode::NUMPAD_DIGITS, VK_NUMPAD0))
        .or_else(|| indexed(&KeyCode::FUNCTION_KEYS, VK_F1))
        .or_else(|| PAIRS.iter().find(|(_, k)| *k == key).map(|(code, _)| *code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_map_to_keys() {
        assert_eq!(to_key_code(0x30), KeyCode::Key0);
        assert_eq!(to_key_code(0x39), KeyCode::Key9);
        assert_eq!(to_key_code(0x41), KeyCode::A);
        assert_eq!(to_key_code(0x5A), KeyCode::Z);
        assert_eq!(to_key_code(0x60), KeyCode::Numpad0);
        assert_eq!(to_key_code(0x70), KeyCode::F1);
        assert_eq!(to_key_code(0x7B), KeyCode::F12);
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(to_key_code(0x1B), KeyCode::Escape);
        assert_eq!(to_key_code(0x10), KeyCode::Shift);
        assert_eq!(to_key_code(0xA1), KeyCode::RightShift);
        assert_eq!(to_key_code(0x05), KeyCode::MouseX1);
    }

    #[test]
    fn test_unmapped_codes_are_preserved() {
        assert_eq!(to_key_code(0xE7), KeyCode::Unknown(0xE7));
        assert_eq!(from_key_code(KeyCode::Unknown(0xE7)), Some(0xE7));
    }

    #[test]
    fn test_every_table_entry_maps_back() {
        for vk in 0u16..=0xFF {
            let key = to_key_code(vk);
            assert_eq!(from_key_code(key), Some(vk), "vk 0x{vk:02x} -> {key:?}");
        }
    }
}
