use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeatError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Терминал не найден: {0}")]
    SeatNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Ошибка экрана: {0}")]
    Display(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl SeatError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(SeatError::DeviceNotFound(msg.into()))
    }

    pub fn seat_not_found<T>(seat_name: impl Into<String>) -> Result<T> {
        Err(SeatError::SeatNotFound(seat_name.into()))
    }
}

pub type Result<T> = std::result::Result<T, SeatError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! seat_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::SeatError::DeviceNotFound(format!($($arg)*))
    };
    (seat_not_found, $($arg:tt)*) => {
        $crate::error::SeatError::SeatNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::SeatError::Permission(format!($($arg)*))
    };
    (display, $($arg:tt)*) => {
        $crate::error::SeatError::Display(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::SeatError::Internal(format!($($arg)*))
    };
}
