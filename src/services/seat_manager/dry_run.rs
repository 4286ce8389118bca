use crate::error::Result;
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::SeatManagerTrait;

/// Эмуляция logind: терминалы из конфигурации, привязки только записываются
pub struct DryRunSeatManager {
    seats: Vec<String>,
    attachments: Mutex<Vec<(String, String)>>,
}

impl DryRunSeatManager {
    pub fn new(seats: Vec<String>) -> Self {
        info!("Dry-run режим - SeatManager работает в режиме эмуляции");
        Self {
            seats,
            attachments: Mutex::new(Vec::new()),
        }
    }

    /// Пары (терминал, sysfs-путь) в порядке запросов
    pub fn attachments(&self) -> Vec<(String, String)> {
        self.attachments.lock().clone()
    }
}

#[async_trait::async_trait]
impl SeatManagerTrait for DryRunSeatManager {
    async fn list_seats(&self) -> Result<Vec<String>> {
        Ok(self.seats.clone())
    }

    async fn attach_device(&self, seat_name: &str, sysfs_path: &str, interactive: bool) -> Result<()> {
        info!(
            "[DRY RUN] AttachDevice({}, {}, {})",
            seat_name, sysfs_path, interactive
        );
        self.attachments
            .lock()
            .push((seat_name.to_string(), sysfs_path.to_string()));
        Ok(())
    }
}
