use crate::error::{Result, SeatError};
use std::fs;
use tracing::{info, warn};

/// Проверить права доступа к необходимым ресурсам
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    // Проверка доступа к /dev/input/
    check_input_devices_access()?;

    // AttachDevice и udevadm требуют привилегий
    check_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = "/dev/input";

    if !std::path::Path::new(input_dir).exists() {
        return Err(SeatError::Permission(
            format!("Директория {} не существует", input_dir)
        ));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir);
            Ok(())
        }
        Err(e) => {
            Err(SeatError::Permission(
                format!("Нет доступа к {}: {}", input_dir, e)
            ))
        }
    }
}

fn check_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            info!("Мастер запущен от имени root");
        }
        Ok(user) => {
            warn!("⚠️  Мастер запущен от имени пользователя {}, а не root!", user);
            warn!("   Привязка устройств к терминалам (logind AttachDevice)");
            warn!("   и перезагрузка правил udev, скорее всего, будут отклонены");
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}
