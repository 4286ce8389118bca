use crate::devices::{DeviceInfo, InputDevice};
use crate::error::{Result, SeatError};
use crate::services::seat_manager::SeatManagerTrait;
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Принудительная перезагрузка правил udev после AttachDevice
pub struct UdevRules {
    enabled: bool,
    dry_run: bool,
}

impl UdevRules {
    pub fn new(enabled: bool, dry_run: bool) -> Self {
        Self { enabled, dry_run }
    }

    /// `udevadm control --reload-rules` и `udevadm trigger`
    pub fn reload(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.dry_run {
            info!("[DRY RUN] udevadm control --reload-rules && udevadm trigger");
            return Ok(());
        }

        Self::udevadm(&["control", "--reload-rules"])?;
        Self::udevadm(&["trigger"])
    }

    fn udevadm(args: &[&str]) -> Result<()> {
        let output = Command::new("udevadm").args(args).output()?;

        if !output.status.success() {
            return Err(SeatError::Internal(format!(
                "udevadm {} завершился с кодом {:?}: {}",
                args.join(" "),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        debug!("udevadm {} выполнен", args.join(" "));
        Ok(())
    }
}

/// Привязка устройств к терминалам с учётом USB-хабов.
///
/// Ошибки здесь никогда не прерывают мастер: они пишутся в лог, а вызывающий
/// получает `false`.
pub struct DeviceAttacher {
    seat_manager: Arc<dyn SeatManagerTrait>,
    udev_rules: UdevRules,
}

impl DeviceAttacher {
    pub fn new(seat_manager: Arc<dyn SeatManagerTrait>, udev_rules: UdevRules) -> Self {
        Self {
            seat_manager,
            udev_rules,
        }
    }

    /// Если устройство висит на хабе с тегом seat, к терминалу уходит весь хаб
    pub async fn attach_input(&self, device: &InputDevice, seat_name: &str) -> bool {
        if let Some(hub) = &device.parent {
            info!(
                "Устройство {} подключено к хабу {}, привязываем хаб",
                device, hub
            );
        }

        self.attach_device(device.attach_target(), seat_name).await
    }

    pub async fn attach_device(&self, device: &DeviceInfo, seat_name: &str) -> bool {
        let sysfs_path = device.syspath.to_string_lossy();

        match self.try_attach(&sysfs_path, seat_name).await {
            Ok(()) => {
                info!(
                    "Устройство {} успешно привязано к терминалу {}",
                    sysfs_path, seat_name
                );
                true
            }
            Err(e) => {
                error!(
                    "Не удалось привязать устройство {} к терминалу {}: {}",
                    sysfs_path, seat_name, e
                );
                false
            }
        }
    }

    async fn try_attach(&self, sysfs_path: &str, seat_name: &str) -> Result<()> {
        self.seat_manager
            .attach_device(seat_name, sysfs_path, false)
            .await?;

        // AttachDevice не всегда сразу подгружает новые правила udev
        self.udev_rules.reload()
    }
}
