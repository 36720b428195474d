//! Column definitions for the users table.

use egui_extras::Column;

pub const ROLE_WIDTH: f32 = 90.0;
pub const PLAN_WIDTH: f32 = 100.0;
pub const ACTIONS_WIDTH: f32 = 150.0;
/// Tall enough for the email link plus the creation time below it.
pub const ROW_HEIGHT: f32 = 40.0;
pub const HEADER_HEIGHT: f32 = 24.0;

/// Table column configuration, in display order:
/// - Email (flexible, fills remaining space)
/// - Role (fixed)
/// - Plan (fixed)
/// - Actions (fixed)
#[inline]
pub fn table_columns() -> Vec<Column> {
    vec![
        Column::remainder().at_least(180.0), // Email - flexible
        Column::exact(ROLE_WIDTH),
        Column::exact(PLAN_WIDTH),
        Column::exact(ACTIONS_WIDTH),
    ]
}
