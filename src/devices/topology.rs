use super::model::{DeviceInfo, HubDevice, InputDevice, ROOT_HUB_VENDOR_ID, SEAT_TAG};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Узел дерева устройств.
///
/// Реализуется для `udev::Device` и для дерева в памяти в тестах. Все методы
/// чтения возвращают `None`, если значение недоступно: ошибка чтения атрибута
/// никогда не прерывает классификацию.
pub trait DeviceNode: Sized {
    fn syspath(&self) -> PathBuf;
    fn devpath(&self) -> String;
    fn devnode(&self) -> Option<PathBuf>;
    fn property(&self, key: &str) -> Option<String>;
    fn attribute(&self, key: &str) -> Option<String>;

    /// Ближайший предок с subsystem `usb` и devtype `usb_device`
    fn usb_device_parent(&self) -> Option<Self>;

    /// Теги udev приходят строкой вида `:seat:uaccess:`
    fn tags(&self) -> BTreeSet<String> {
        ["TAGS", "CURRENT_TAGS"]
            .iter()
            .filter_map(|key| self.property(key))
            .flat_map(|value| {
                value
                    .split(':')
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            syspath: self.syspath(),
            devpath: self.devpath(),
            devnode: self.devnode(),
            seat: self.property("ID_SEAT"),
            tags: self.tags(),
        }
    }
}

fn is_root_hub<D: DeviceNode>(device: &D) -> bool {
    device.attribute("idVendor").as_deref() == Some(ROOT_HUB_VENDOR_ID)
}

fn hub_device<D: DeviceNode>(device: &D) -> HubDevice {
    HubDevice {
        info: device.device_info(),
        vendor_id: device.attribute("idVendor"),
        product_id: device.attribute("idProduct"),
    }
}

/// Найти USB-хаб, который нужно привязывать вместо самого устройства.
///
/// Поднимаемся по USB-предкам: промежуточные хабы без тега `seat` пропускаются,
/// корневой хаб или отсутствие предка означает прямое подключение (`None`).
pub fn resolve_parent_hub<D: DeviceNode>(device: &D) -> Option<HubDevice> {
    let mut current = device.usb_device_parent()?;

    loop {
        if is_root_hub(&current) {
            return None;
        }

        let hub = hub_device(&current);
        if hub.info.has_tag(SEAT_TAG) {
            return Some(hub);
        }

        current = current.usb_device_parent()?;
    }
}

/// Построить список устройств ввода; устройства без узла в /dev отбрасываются
pub fn classify_input_devices<D, I>(devices: I) -> Vec<InputDevice>
where
    D: DeviceNode,
    I: IntoIterator<Item = D>,
{
    devices
        .into_iter()
        .filter(|device| device.devnode().is_some())
        .map(|device| InputDevice {
            info: device.device_info(),
            parent: resolve_parent_hub(&device),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    pub(crate) struct FakeDevice {
        parent: Option<String>,
        usb_device: bool,
        devnode: Option<String>,
        properties: HashMap<String, String>,
        attributes: HashMap<String, String>,
    }

    /// Статическое дерево устройств, ключ - syspath
    #[derive(Debug, Default)]
    pub(crate) struct FakeTree {
        devices: HashMap<String, FakeDevice>,
    }

    impl FakeTree {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        fn insert(&mut self, syspath: &str, parent: Option<&str>, device: FakeDevice) {
            self.devices.insert(
                syspath.to_string(),
                FakeDevice {
                    parent: parent.map(str::to_string),
                    ..device
                },
            );
        }

        pub(crate) fn usb_hub(&mut self, syspath: &str, parent: Option<&str>, vendor: &str, seat_tag: bool) -> &mut Self {
            let mut device = FakeDevice {
                usb_device: true,
                ..FakeDevice::default()
            };
            device.attributes.insert("idVendor".to_string(), vendor.to_string());
            device.attributes.insert("idProduct".to_string(), "0608".to_string());
            if seat_tag {
                device.properties.insert("TAGS".to_string(), ":seat:".to_string());
            }
            self.insert(syspath, parent, device);
            self
        }

        pub(crate) fn input(&mut self, syspath: &str, parent: Option<&str>, devnode: Option<&str>, seat: Option<&str>) -> &mut Self {
            let mut device = FakeDevice {
                devnode: devnode.map(str::to_string),
                ..FakeDevice::default()
            };
            if let Some(seat) = seat {
                device.properties.insert("ID_SEAT".to_string(), seat.to_string());
            }
            self.insert(syspath, parent, device);
            self
        }

        pub(crate) fn node<'a>(&'a self, syspath: &'a str) -> FakeNode<'a> {
            FakeNode { tree: self, syspath }
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub(crate) struct FakeNode<'a> {
        tree: &'a FakeTree,
        syspath: &'a str,
    }

    impl<'a> FakeNode<'a> {
        fn device(&self) -> &'a FakeDevice {
            &self.tree.devices[self.syspath]
        }
    }

    impl<'a> DeviceNode for FakeNode<'a> {
        fn syspath(&self) -> PathBuf {
            PathBuf::from(self.syspath)
        }

        fn devpath(&self) -> String {
            self.syspath.trim_start_matches("/sys").to_string()
        }

        fn devnode(&self) -> Option<PathBuf> {
            self.device().devnode.as_ref().map(PathBuf::from)
        }

        fn property(&self, key: &str) -> Option<String> {
            self.device().properties.get(key).cloned()
        }

        fn attribute(&self, key: &str) -> Option<String> {
            self.device().attributes.get(key).cloned()
        }

        fn usb_device_parent(&self) -> Option<Self> {
            let mut parent = self.device().parent.as_deref();
            while let Some(syspath) = parent {
                let (key, device) = self.tree.devices.get_key_value(syspath)?;
                if device.usb_device {
                    return Some(FakeNode {
                        tree: self.tree,
                        syspath: key.as_str(),
                    });
                }
                parent = device.parent.as_deref();
            }
            None
        }
    }

    const ROOT: &str = "/sys/devices/pci0000:00/usb1";

    fn tree() -> FakeTree {
        let mut tree = FakeTree::new();
        tree.usb_hub(ROOT, None, ROOT_HUB_VENDOR_ID, true)
            // Клавиатура прямо в порту компьютера
            .input("/sys/usb1/1-1/input/input1", Some(ROOT), None, None)
            .input("/sys/usb1/1-1/input/input1/event1", Some("/sys/usb1/1-1/input/input1"), Some("/dev/input/event1"), None)
            // Хаб с тегом seat
            .usb_hub("/sys/usb1/1-2", Some(ROOT), "05e3", true)
            .input("/sys/usb1/1-2/1-2.1/event2", Some("/sys/usb1/1-2"), Some("/dev/input/event2"), None)
            // Два хаба без тега внутри хаба с тегом
            .usb_hub("/sys/usb1/1-3", Some(ROOT), "05e3", true)
            .usb_hub("/sys/usb1/1-3/1-3.1", Some("/sys/usb1/1-3"), "0424", false)
            .usb_hub("/sys/usb1/1-3/1-3.1/1-3.1.4", Some("/sys/usb1/1-3/1-3.1"), "0424", false)
            .input("/sys/usb1/1-3/1-3.1/1-3.1.4/event3", Some("/sys/usb1/1-3/1-3.1/1-3.1.4"), Some("/dev/input/event3"), Some("seat1"))
            // Хабы без тега прямо под корневым хабом
            .usb_hub("/sys/usb1/1-4", Some(ROOT), "0424", false)
            .usb_hub("/sys/usb1/1-4/1-4.2", Some("/sys/usb1/1-4"), "0424", false)
            .input("/sys/usb1/1-4/1-4.2/event4", Some("/sys/usb1/1-4/1-4.2"), Some("/dev/input/event4"), None)
            // PS/2: USB-предков нет вообще
            .input("/sys/devices/platform/i8042/serio0/event5", None, Some("/dev/input/event5"), None);
        tree
    }

    #[test]
    fn test_root_hub_parent_resolves_to_none() {
        let tree = tree();
        let keyboard = tree.node("/sys/usb1/1-1/input/input1/event1");
        assert_eq!(resolve_parent_hub(&keyboard), None);
    }

    #[test]
    fn test_seat_tagged_hub_is_parent() {
        let tree = tree();
        let hub = resolve_parent_hub(&tree.node("/sys/usb1/1-2/1-2.1/event2")).unwrap();
        assert_eq!(hub.info.syspath, PathBuf::from("/sys/usb1/1-2"));
        assert_eq!(hub.vendor_id.as_deref(), Some("05e3"));
        assert_eq!(hub.product_id.as_deref(), Some("0608"));
        assert!(hub.info.has_tag(SEAT_TAG));
    }

    #[test]
    fn test_untagged_hubs_are_skipped() {
        let tree = tree();
        let hub = resolve_parent_hub(&tree.node("/sys/usb1/1-3/1-3.1/1-3.1.4/event3")).unwrap();
        assert_eq!(hub.info.syspath, PathBuf::from("/sys/usb1/1-3"));
    }

    #[test]
    fn test_untagged_hubs_up_to_root_resolve_to_none() {
        let tree = tree();
        assert_eq!(resolve_parent_hub(&tree.node("/sys/usb1/1-4/1-4.2/event4")), None);
    }

    #[test]
    fn test_device_without_usb_ancestor_resolves_to_none() {
        let tree = tree();
        assert_eq!(resolve_parent_hub(&tree.node("/sys/devices/platform/i8042/serio0/event5")), None);
    }

    #[test]
    fn test_missing_vendor_id_degrades_to_none() {
        let mut tree = FakeTree::new();
        tree.usb_hub(ROOT, None, ROOT_HUB_VENDOR_ID, false)
            .input("/sys/usb1/1-5", Some(ROOT), None, None)
            .input("/sys/usb1/1-5/event6", Some("/sys/usb1/1-5"), Some("/dev/input/event6"), None);
        tree.devices.get_mut("/sys/usb1/1-5").unwrap().usb_device = true;
        tree.devices
            .get_mut("/sys/usb1/1-5")
            .unwrap()
            .properties
            .insert("TAGS".to_string(), ":seat:uaccess:".to_string());

        let hub = resolve_parent_hub(&tree.node("/sys/usb1/1-5/event6")).unwrap();
        assert_eq!(hub.vendor_id, None);
        assert_eq!(hub.product_id, None);
    }

    #[test]
    fn test_classify_drops_devices_without_node() {
        let tree = tree();
        let nodes = [
            "/sys/usb1/1-1/input/input1",
            "/sys/usb1/1-1/input/input1/event1",
            "/sys/usb1/1-3/1-3.1/1-3.1.4/event3",
        ]
        .map(|syspath| tree.node(syspath));

        let devices = classify_input_devices(nodes);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].info.devnode, Some(PathBuf::from("/dev/input/event1")));
        assert_eq!(devices[1].info.seat.as_deref(), Some("seat1"));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let tree = tree();
        let syspaths = [
            "/sys/usb1/1-1/input/input1/event1",
            "/sys/usb1/1-2/1-2.1/event2",
            "/sys/usb1/1-3/1-3.1/1-3.1.4/event3",
            "/sys/usb1/1-4/1-4.2/event4",
            "/sys/devices/platform/i8042/serio0/event5",
        ];

        let first = classify_input_devices(syspaths.map(|syspath| tree.node(syspath)));
        let second = classify_input_devices(syspaths.map(|syspath| tree.node(syspath)));
        assert_eq!(first, second);
    }
}
