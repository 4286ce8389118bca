use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;

/// Трейт менеджера терминалов (systemd-logind или эмуляция)
#[async_trait::async_trait]
pub trait SeatManagerTrait: Send + Sync {
    /// Имена всех терминалов
    async fn list_seats(&self) -> Result<Vec<String>>;

    /// Привязать устройство по sysfs-пути к терминалу.
    /// `interactive` у нас всегда `false`: привязка должна сохраниться.
    async fn attach_device(&self, seat_name: &str, sysfs_path: &str, interactive: bool) -> Result<()>;
}

/// Фабрика менеджера терминалов в зависимости от флага dry_run
pub async fn create_seat_manager(
    config: &Config,
    dry_run: bool,
) -> Result<Arc<dyn SeatManagerTrait>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunSeatManager::new(
            config.dry_run.seats.clone(),
        )))
    } else {
        Ok(Arc::new(super::logind::LogindSeatManager::connect().await?))
    }
}
