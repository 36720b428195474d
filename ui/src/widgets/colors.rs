//! Shared color constants for the UI.

use egui::Color32;

/// Red color for the failed-load alert.
pub const COLOR_ERROR: Color32 = Color32::from_rgb(220, 53, 69);

/// Subtle gray for the table frame.
pub const TABLE_BORDER_COLOR: Color32 = Color32::from_rgb(200, 200, 200);
