use crate::config::Config;
use crate::error::Result;
use crate::services::seat_registry::SeatBitmap;
use std::path::PathBuf;
use tracing::info;

use super::r#trait::DisplaySurfaceTrait;

/// Экраны лежат в `{directory}/seat{index}-{bitmap}.png`
pub struct DisplayPresenter {
    surface: Box<dyn DisplaySurfaceTrait>,
    screens_dir: PathBuf,
    wait_image: String,
}

impl DisplayPresenter {
    pub fn new(surface: Box<dyn DisplaySurfaceTrait>, config: &Config) -> Self {
        Self {
            surface,
            screens_dir: config.screens.directory.clone(),
            wait_image: config.screens.wait_image.clone(),
        }
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.surface.set_title(title)
    }

    pub fn show_wait_screen(&mut self) -> Result<()> {
        let image_path = self.screens_dir.join(&self.wait_image);
        info!("Загрузка картинки {}", image_path.display());
        self.surface.load_image(&image_path)
    }

    pub fn show_status(&mut self, seat_index: usize, bitmap: &SeatBitmap) -> Result<()> {
        let image_path = self.status_image_path(seat_index, bitmap);
        info!("Загрузка картинки {}", image_path.display());
        self.surface.load_image(&image_path)
    }

    pub fn show_message(&mut self, message: &str) -> Result<()> {
        self.surface.write_message(message)
    }

    pub fn status_image_path(&self, seat_index: usize, bitmap: &SeatBitmap) -> PathBuf {
        self.screens_dir
            .join(format!("seat{}-{}.png", seat_index, bitmap.file_code()))
    }
}
