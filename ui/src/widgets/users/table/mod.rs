//! Table components for the users list.
//!
//! - `columns`: Column definitions and widths
//! - `header`: Table header rendering
//! - `row`: Individual row rendering and the intent it produced
//! - `cells`: Cell rendering functions for each column type

mod cells;
pub mod columns;
pub mod header;
pub mod row;
