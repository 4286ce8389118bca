//! Классификация устройств ввода и разрешение их USB-хабов
//!
//! Модуль отвечает ТОЛЬКО за построение снимка устройств (клавиатуры, мыши и
//! хабы, к которым они подключены). Решения о привязке к терминалам здесь не
//! принимаются.

pub mod device_finder;
pub mod model;
pub mod topology;

pub use device_finder::DeviceFinder;
pub use model::{DeviceInfo, InputDevice};
pub use topology::{classify_input_devices, DeviceNode};
