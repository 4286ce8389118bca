pub mod attachment;
pub mod display;
pub mod keyboard_listener;
pub mod seat_claim;
pub mod seat_manager;
pub mod seat_registry;

pub use attachment::{DeviceAttacher, UdevRules};
pub use display::create_display_surface;
pub use keyboard_listener::create_keyboard_listener;
pub use seat_claim::{ClaimOutcome, SeatClaimCoordinator};
pub use seat_manager::create_seat_manager;
pub use seat_registry::SeatRegistry;
