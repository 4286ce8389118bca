use crate::config::Config;
use crate::devices::InputDevice;
use crate::error::Result;
use crate::events::KeyEvent;

/// Источник событий одной клавиатуры
#[async_trait::async_trait]
pub trait KeyboardListenerTrait {
    /// Дождаться следующего события клавиши. Ожидание не ограничено по времени.
    async fn next_key_event(&mut self) -> Result<KeyEvent>;
}

/// Factory function to create an appropriate keyboard listener based on the dry_run flag
pub fn create_keyboard_listener(
    config: &Config,
    keyboard: &InputDevice,
    dry_run: bool,
) -> Result<Box<dyn KeyboardListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_keyboard_listener::DryRunKeyboardListener::new(
            config, keyboard,
        )))
    } else {
        Ok(Box::new(super::keyboard_listener::RealKeyboardListener::new(
            keyboard,
        )?))
    }
}
