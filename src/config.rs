//! Platform configuration.

use crate::util::geometry::Rect;

/// Configuration for the window platform.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Bounds of the primary display in pixels
    pub primary_display_bounds: Rect,
    /// Output scale factor
    pub output_scale: f32,
    /// Display id windows are placed on when none is assigned
    pub default_display_id: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            primary_display_bounds: Rect::new(0, 0, 1920, 1080),
            output_scale: 1.0,
            default_display_id: String::new(),
        }
    }
}
