use crate::error::Result;
use std::path::Path;

/// Полноэкранная поверхность с одной картинкой и одной строкой текста
pub trait DisplaySurfaceTrait: Send {
    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Очистить экран и показать картинку по центру
    fn load_image(&mut self, image_path: &Path) -> Result<()>;

    /// Строка текста в фиксированной позиции поверх картинки
    fn write_message(&mut self, message: &str) -> Result<()>;
}

/// Factory function to create an appropriate display surface based on the dry_run flag
pub fn create_display_surface(dry_run: bool) -> Result<Box<dyn DisplaySurfaceTrait>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunSurface::new()))
    } else {
        Ok(Box::new(super::x11::X11Surface::connect()?))
    }
}
