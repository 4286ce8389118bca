use crate::events::KeyCode;
use evdev::KeyCode as EvdevKeyCode;

/// Функциональные клавиши, которыми выбирается терминал
const FUNCTION_KEYS: [(EvdevKeyCode, &str); 12] = [
    (EvdevKeyCode::KEY_F1, "F1"),
    (EvdevKeyCode::KEY_F2, "F2"),
    (EvdevKeyCode::KEY_F3, "F3"),
    (EvdevKeyCode::KEY_F4, "F4"),
    (EvdevKeyCode::KEY_F5, "F5"),
    (EvdevKeyCode::KEY_F6, "F6"),
    (EvdevKeyCode::KEY_F7, "F7"),
    (EvdevKeyCode::KEY_F8, "F8"),
    (EvdevKeyCode::KEY_F9, "F9"),
    (EvdevKeyCode::KEY_F10, "F10"),
    (EvdevKeyCode::KEY_F11, "F11"),
    (EvdevKeyCode::KEY_F12, "F12"),
];

pub struct KeyMapper;

impl KeyMapper {
    pub fn get_key_name(key_code: KeyCode) -> Option<&'static str> {
        FUNCTION_KEYS
            .iter()
            .find(|(code, _)| code.code() == key_code.value())
            .map(|(_, name)| *name)
    }

    pub fn get_key_code(name: &str) -> Option<KeyCode> {
        FUNCTION_KEYS
            .iter()
            .find(|(_, key_name)| key_name.eq_ignore_ascii_case(name))
            .map(|(code, _)| KeyCode::new(code.code()))
    }
}
