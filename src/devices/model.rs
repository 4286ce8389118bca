use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Тег udev, которым помечаются устройства, привязываемые к терминалу целиком
pub const SEAT_TAG: &str = "seat";

/// Все корневые хабы имеют производителя 1d6b (Linux Foundation)
pub const ROOT_HUB_VENDOR_ID: &str = "1d6b";

/// Общие атрибуты любого устройства из дерева udev
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub syspath: PathBuf,
    pub devpath: String,
    pub devnode: Option<PathBuf>,
    pub seat: Option<String>,
    pub tags: BTreeSet<String>,
}

impl DeviceInfo {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_unassigned(&self) -> bool {
        self.seat.is_none()
    }

    pub fn node_display(&self) -> String {
        self.devnode
            .as_ref()
            .map(|node| node.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// USB-хаб, который можно привязать к терминалу вместе со всеми потомками
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubDevice {
    pub info: DeviceInfo,
    pub vendor_id: Option<String>,
    pub product_id: Option<String>,
}

impl fmt::Display for HubDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}:{}]",
            self.info.syspath.display(),
            self.vendor_id.as_deref().unwrap_or("????"),
            self.product_id.as_deref().unwrap_or("????")
        )
    }
}

/// Клавиатура или мышь.
///
/// `parent` вычисляется один раз при сканировании. `None` означает, что устройство
/// подключено напрямую к порту компьютера и привязывается само по себе.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    pub info: DeviceInfo,
    pub parent: Option<HubDevice>,
}

impl InputDevice {
    pub fn is_direct(&self) -> bool {
        self.parent.is_none()
    }

    /// Устройство, которое на самом деле уходит в AttachDevice
    pub fn attach_target(&self) -> &DeviceInfo {
        match &self.parent {
            Some(hub) => &hub.info,
            None => &self.info,
        }
    }
}

impl fmt::Display for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.info.node_display(), self.info.syspath.display())
    }
}
