//! Users list panel.
//!
//! - `controls`: search, sort, page size and list-wide buttons
//! - `status`: loading and error views
//! - `table`: the users table (columns, header, row, cells)
//! - `debug_dump`: window with the raw payload

mod controls;
mod debug_dump;
mod panel;
mod status;
pub mod table;

pub use debug_dump::debug_dump_window;
pub use panel::users_panel;
