use crate::error::Result;
use std::path::Path;
use tracing::info;

use super::r#trait::DisplaySurfaceTrait;

pub struct DryRunSurface;

impl DryRunSurface {
    pub fn new() -> Self {
        info!("Dry-run режим - экран мастера работает в режиме эмуляции");
        Self
    }
}

impl DisplaySurfaceTrait for DryRunSurface {
    fn set_title(&mut self, title: &str) -> Result<()> {
        info!("[DRY RUN] Заголовок окна: {}", title);
        Ok(())
    }

    fn load_image(&mut self, image_path: &Path) -> Result<()> {
        info!("[DRY RUN] Картинка: {}", image_path.display());
        Ok(())
    }

    fn write_message(&mut self, message: &str) -> Result<()> {
        info!("[DRY RUN] Сообщение: {}", message);
        Ok(())
    }
}
