//! SeatManager service: доступ к системному менеджеру терминалов
//!
//! Только перечисление терминалов и низкоуровневая привязка устройства по sysfs-пути.
//! Перенаправление на хабы и перезагрузка правил udev живут в `attachment`.

mod dry_run;
mod logind;
mod r#trait;

pub use self::dry_run::DryRunSeatManager;
pub use self::r#trait::{create_seat_manager, SeatManagerTrait};
