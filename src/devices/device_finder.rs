use super::{classify_input_devices, DeviceNode, InputDevice};
use crate::error::Result;
use std::path::PathBuf;
use tracing::{debug, info};

impl DeviceNode for udev::Device {
    fn syspath(&self) -> PathBuf {
        udev::Device::syspath(self).to_path_buf()
    }

    fn devpath(&self) -> String {
        udev::Device::devpath(self).to_string_lossy().into_owned()
    }

    fn devnode(&self) -> Option<PathBuf> {
        udev::Device::devnode(self).map(|node| node.to_path_buf())
    }

    fn property(&self, key: &str) -> Option<String> {
        self.property_value(key)
            .map(|value| value.to_string_lossy().into_owned())
    }

    fn attribute(&self, key: &str) -> Option<String> {
        self.attribute_value(key)
            .map(|value| value.to_string_lossy().trim().to_string())
    }

    fn usb_device_parent(&self) -> Option<Self> {
        match self.parent_with_subsystem_devtype("usb", "usb_device") {
            Ok(parent) => parent,
            Err(e) => {
                debug!("Не удалось получить USB-предка {:?}: {}", udev::Device::syspath(self), e);
                None
            }
        }
    }
}

/// Сканер устройств ввода через libudev
pub struct DeviceFinder;

impl DeviceFinder {
    /// Все клавиатуры с узлом в /dev
    pub fn scan_keyboards() -> Result<Vec<InputDevice>> {
        let keyboards = Self::scan("ID_INPUT_KEYBOARD", None)?;
        info!("Найдено клавиатур: {}", keyboards.len());
        Ok(keyboards)
    }

    /// Все мыши (только event* узлы)
    pub fn scan_mice() -> Result<Vec<InputDevice>> {
        let mice = Self::scan("ID_INPUT_MOUSE", Some("event*"))?;
        info!("Найдено мышей: {}", mice.len());
        Ok(mice)
    }

    fn scan(capability: &str, sysname: Option<&str>) -> Result<Vec<InputDevice>> {
        let mut enumerator = udev::Enumerator::new()?;
        enumerator.match_subsystem("input")?;
        enumerator.match_property(capability, "1")?;

        if let Some(sysname) = sysname {
            enumerator.match_sysname(sysname)?;
        }

        let devices = classify_input_devices(enumerator.scan_devices()?);

        for device in &devices {
            debug!("{}: {} (seat: {:?})", capability, device, device.info.seat);
        }

        Ok(devices)
    }

    /// Устройства, ещё не привязанные ни к одному терминалу
    pub fn unassigned(devices: &[InputDevice]) -> Vec<InputDevice> {
        devices
            .iter()
            .filter(|device| device.info.is_unassigned())
            .cloned()
            .collect()
    }
}
