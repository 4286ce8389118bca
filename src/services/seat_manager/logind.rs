use crate::error::Result;
use tracing::{debug, info};
use zbus::{proxy, zvariant::OwnedObjectPath, Connection};

use super::r#trait::SeatManagerTrait;

#[proxy(
    interface = "org.freedesktop.login1.Manager",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1"
)]
trait LoginManager {
    /// ListSeats() -> a(so)
    fn list_seats(&self) -> zbus::Result<Vec<(String, OwnedObjectPath)>>;

    /// AttachDevice(s seat_id, s sysfs_path, b interactive)
    fn attach_device(&self, seat_id: &str, sysfs_path: &str, interactive: bool) -> zbus::Result<()>;
}

/// systemd-logind на системной шине
pub struct LogindSeatManager {
    proxy: LoginManagerProxy<'static>,
}

impl LogindSeatManager {
    pub async fn connect() -> Result<Self> {
        info!("Подключение к systemd-logind через системную шину D-Bus");

        let connection = Connection::system().await?;
        let proxy = LoginManagerProxy::new(&connection).await?;

        Ok(Self { proxy })
    }
}

#[async_trait::async_trait]
impl SeatManagerTrait for LogindSeatManager {
    async fn list_seats(&self) -> Result<Vec<String>> {
        let seats = self.proxy.list_seats().await?;
        debug!("logind вернул терминалы: {:?}", seats);

        Ok(seats.into_iter().map(|(name, _)| name).collect())
    }

    async fn attach_device(&self, seat_name: &str, sysfs_path: &str, interactive: bool) -> Result<()> {
        debug!("AttachDevice({}, {}, {})", seat_name, sysfs_path, interactive);
        self.proxy
            .attach_device(seat_name, sysfs_path, interactive)
            .await?;
        Ok(())
    }
}
