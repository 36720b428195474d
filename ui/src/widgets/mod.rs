mod colors;
mod navigation;
pub mod users;

pub use navigation::last_navigation;
pub use users::{debug_dump_window, users_panel};
