mod dry_keyboard_listener;
mod keyboard_listener;
mod key_mapping;
mod r#trait;

pub use self::key_mapping::KeyMapper;
pub use self::r#trait::{create_keyboard_listener, KeyboardListenerTrait};
