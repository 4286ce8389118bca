use crate::config::Config;
use crate::devices::InputDevice;
use crate::error::Result;
use crate::events::{KeyCode, KeyEvent};
use std::collections::VecDeque;
use tokio::time::Duration;
use tracing::{info, warn};

use super::key_mapping::KeyMapper;
use super::r#trait::KeyboardListenerTrait;

/// Эмуляция клавиатуры: проигрывает `dry_run.keys`, затем ждёт бесконечно
pub struct DryRunKeyboardListener {
    script: VecDeque<KeyCode>,
    delay: Duration,
    device_node: String,
}

impl DryRunKeyboardListener {
    pub fn new(config: &Config, keyboard: &InputDevice) -> Self {
        let script = config
            .dry_run
            .keys
            .iter()
            .filter_map(|name| {
                let code = KeyMapper::get_key_code(name);
                if code.is_none() {
                    warn!("Неизвестная клавиша в dry_run.keys: {}", name);
                }
                code
            })
            .collect();

        Self {
            script,
            delay: Duration::from_millis(config.dry_run.key_delay_ms),
            device_node: keyboard.info.node_display(),
        }
    }
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for DryRunKeyboardListener {
    async fn next_key_event(&mut self) -> Result<KeyEvent> {
        match self.script.pop_front() {
            Some(key_code) => {
                tokio::time::sleep(self.delay).await;
                info!(
                    "[DRY RUN] Эмулируем нажатие {} на {}",
                    KeyMapper::get_key_name(key_code).unwrap_or("?"),
                    self.device_node
                );
                Ok(KeyEvent::press(key_code, self.device_node.clone()))
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::DeviceInfo;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_dry_run_replays_script() {
        let mut config = Config::default();
        config.dry_run.keys = vec!["F2".to_string(), "bogus".to_string(), "F1".to_string()];
        config.dry_run.key_delay_ms = 0;

        let keyboard = InputDevice {
            info: DeviceInfo {
                syspath: PathBuf::from("/sys/class/input/event4"),
                devpath: "/class/input/event4".to_string(),
                devnode: Some(PathBuf::from("/dev/input/event4")),
                seat: None,
                tags: BTreeSet::new(),
            },
            parent: None,
        };

        let mut listener = DryRunKeyboardListener::new(&config, &keyboard);
        let first = listener.next_key_event().await.unwrap();
        let second = listener.next_key_event().await.unwrap();

        assert_eq!(first.key_code.seat_candidate(), 2);
        assert_eq!(second.key_code.seat_candidate(), 1);
        assert!(first.is_press());
        assert_eq!(first.device_node, "/dev/input/event4");
    }
}
