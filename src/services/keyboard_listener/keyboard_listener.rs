use crate::debug_if_enabled;
use crate::devices::InputDevice;
use crate::error::{Result, SeatError};
use crate::events::{KeyCode, KeyEvent, KeyState};
use evdev::{Device, EventStream, EventType};
use tracing::{debug, info};

use super::r#trait::KeyboardListenerTrait;

/// Чтение событий клавиатуры через evdev.
///
/// Устройство НЕ захватывается эксклюзивно: то же нажатие должны увидеть
/// мастера всех остальных терминалов.
pub struct RealKeyboardListener {
    stream: EventStream,
    device_node: String,
}

impl RealKeyboardListener {
    pub fn new(keyboard: &InputDevice) -> Result<Self> {
        let Some(device_path) = keyboard.info.devnode.as_ref() else {
            return SeatError::device_not_found(format!(
                "У клавиатуры {} нет узла в /dev",
                keyboard.info.syspath.display()
            ));
        };

        let device = Device::open(device_path).map_err(|e| {
            SeatError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        info!(
            "Слушаем клавиатуру {} ({})",
            device_path.display(),
            device.name().unwrap_or("Unknown")
        );

        Ok(Self {
            stream: device.into_event_stream()?,
            device_node: device_path.display().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for RealKeyboardListener {
    async fn next_key_event(&mut self) -> Result<KeyEvent> {
        loop {
            let event = self.stream.next_event().await?;

            if event.event_type() != EventType::KEY {
                continue;
            }

            let state = match KeyState::from_value(event.value()) {
                Some(state) => state,
                None => {
                    debug!("Неизвестное значение события: {}", event.value());
                    continue;
                }
            };

            let key_event = KeyEvent::new(KeyCode::new(event.code()), state, self.device_node.clone());
            debug_if_enabled!("Событие клавиши: {}", key_event);

            return Ok(key_event);
        }
    }
}
