//! Host-facing delegate interface.
//!
//! The window core does not own any UI. The host toolkit that embeds it
//! implements `WindowDelegate` and reacts to the callbacks by updating its
//! own widget tree.

use crate::core::commands::WindowHandle;
use crate::util::geometry::Rect;

/// Host callbacks for a single window.
///
/// All callbacks fire on the control thread, synchronously from the window
/// operation that caused them.
pub trait WindowDelegate {
    /// The window received its handle and can accept host content.
    fn on_widget_available(&self, handle: WindowHandle);

    /// The window's bounds changed (including clamping adjustments).
    fn on_bounds_changed(&self, bounds: Rect);

    /// The window asks the host to close it (tooltip hide path).
    fn on_close_requested(&self);
}

/// No-op delegate for tests and headless use.
#[derive(Default)]
pub struct StubDelegate;

impl WindowDelegate for StubDelegate {
    fn on_widget_available(&self, handle: WindowHandle) {
        tracing::debug!("StubDelegate: widget {} available", handle);
    }

    fn on_bounds_changed(&self, bounds: Rect) {
        tracing::debug!("StubDelegate: bounds changed to {:?}", bounds);
    }

    fn on_close_requested(&self) {
        tracing::debug!("StubDelegate: close requested");
    }
}
