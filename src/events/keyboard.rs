use serde::{Deserialize, Serialize};
use std::fmt;

/// Состояние клавиши (значение EV_KEY события)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

impl KeyState {
    /// EV_KEY: 0 - отпускание, 1 - нажатие, 2 - удержание
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            2 => Some(KeyState::Repeat),
            _ => None,
        }
    }
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const F1: KeyCode = KeyCode(evdev::KeyCode::KEY_F1.0);

    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    /// Номер терминала, который выбирает клавиша: F1 -> 1, F2 -> 2, ...
    ///
    /// Для клавиш "левее" F1 результат может быть нулевым или отрицательным,
    /// такие нажатия просто не проходят проверку.
    pub fn seat_candidate(&self) -> i32 {
        i32::from(self.0) - i32::from(Self::F1.0) + 1
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Событие клавиатуры
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
    pub timestamp: std::time::Instant,
    pub device_node: String,
}

impl KeyEvent {
    pub fn new(key_code: KeyCode, state: KeyState, device_node: String) -> Self {
        Self {
            key_code,
            state,
            timestamp: std::time::Instant::now(),
            device_node,
        }
    }

    pub fn press(key_code: KeyCode, device_node: String) -> Self {
        Self::new(key_code, KeyState::Pressed, device_node)
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Pressed
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {:?} ({})",
            self.key_code,
            self.device_node,
            self.state,
            self.timestamp.elapsed().as_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_candidate_from_function_keys() {
        assert_eq!(KeyCode::F1.seat_candidate(), 1);
        assert_eq!(KeyCode::new(KeyCode::F1.value() + 2).seat_candidate(), 3);
        assert_eq!(KeyCode::new(evdev::KeyCode::KEY_ESC.0).seat_candidate() < 1, true);
    }

    #[test]
    fn test_key_state_from_value() {
        assert_eq!(KeyState::from_value(1), Some(KeyState::Pressed));
        assert_eq!(KeyState::from_value(0), Some(KeyState::Released));
        assert_eq!(KeyState::from_value(2), Some(KeyState::Repeat));
        assert_eq!(KeyState::from_value(7), None);
    }

    #[test]
    fn test_only_pressed_events_are_presses() {
        let press = KeyEvent::press(KeyCode::F1, "/dev/input/event3".to_string());
        let release = KeyEvent::new(KeyCode::F1, KeyState::Released, "/dev/input/event3".to_string());

        assert!(press.is_press());
        assert!(!release.is_press());
    }
}
