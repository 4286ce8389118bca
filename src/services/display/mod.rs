//! Display service: экран мастера
//!
//! Поверхность (`DisplaySurfaceTrait`) умеет только показать картинку и строку текста.
//! `DisplayPresenter` выбирает картинку по номеру терминала и состояниям терминалов.
//! Логики протокола здесь нет.

mod dry_run;
mod presenter;
mod r#trait;
mod x11;

pub use self::presenter::DisplayPresenter;
pub use self::r#trait::{create_display_surface, DisplaySurfaceTrait};
