//! Window registry: the window-manager collaborator.
//!
//! Windows are peers; shared facts about them live here. The registry
//! allocates handles, mirrors each window's bounds for parent lookups,
//! tracks the active window per display, the installed platform cursor,
//! the event grabber, and the saved bounds used by `restore()`.
//!
//! The registry never owns a window. Windows register on construction,
//! keep their mirror entry current, and unregister on close/drop.

use crate::core::commands::WindowHandle;
use crate::core::window::cursor::PlatformCursor;
use crate::prelude::*;

/// Shared per-window facts mirrored out of `ShellWindow`.
#[derive(Debug, Clone, Default)]
struct WindowEntry {
    bounds: Rect,
    display_id: String,
    /// Bounds to return to on restore, captured before a state snap
    saved_bounds: Option<Rect>,
}

/// Registry of live windows and cross-window state.
pub struct WindowRegistry {
    primary_display_bounds: Rect,
    next_handle: WindowHandle,
    entries: HashMap<WindowHandle, WindowEntry>,
    /// Active window per display id
    active: HashMap<String, WindowHandle>,
    platform_cursor: Option<PlatformCursor>,
    event_grabber: Option<WindowHandle>,
}

impl WindowRegistry {
    pub fn new(primary_display_bounds: Rect) -> Self {
        Self {
            primary_display_bounds,
            next_handle: 0,
            entries: HashMap::new(),
            active: HashMap::new(),
            platform_cursor: None,
            event_grabber: None,
        }
    }

    // =========================================================================
    // Handle allocation and lifecycle
    // =========================================================================

    /// Allocate the next window handle. Handles start at 1; 0 is never a
    /// valid window.
    pub fn next_handle(&mut self) -> WindowHandle {
        self.next_handle = self.next_handle.wrapping_add(1);
        self.next_handle
    }

    /// Track a newly constructed window.
    pub fn on_window_created(&mut self, handle: WindowHandle, display_id: &str, bounds: Rect) {
        tracing::debug!("window {} created on display '{}'", handle, display_id);
        self.entries.insert(
            handle,
            WindowEntry {
                bounds,
                display_id: display_id.to_string(),
                saved_bounds: None,
            },
        );
    }

    /// Forget a closed window and any state pointing at it.
    pub fn on_window_closed(&mut self, handle: WindowHandle) {
        tracing::debug!("window {} closed", handle);
        self.entries.remove(&handle);
        self.active.retain(|_, active| *active != handle);
        if self.event_grabber == Some(handle) {
            self.event_grabber = None;
        }
    }

    /// Move a window between displays (`displayAffinity` property change).
    pub fn on_window_display_changed(
        &mut self,
        prev_display_id: &str,
        display_id: &str,
        handle: WindowHandle,
    ) {
        tracing::debug!(
            "window {} moved from display '{}' to '{}'",
            handle,
            prev_display_id,
            display_id
        );
        if self.active.get(prev_display_id) == Some(&handle) {
            self.active.remove(prev_display_id);
        }
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.display_id = display_id.to_string();
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// The active window on the given display, if any.
    pub fn active_window(&self, display_id: &str) -> Option<WindowHandle> {
        self.active.get(display_id).copied()
    }

    /// Mark a window active on its display.
    pub fn set_active_window(&mut self, handle: WindowHandle) {
        if let Some(entry) = self.entries.get(&handle) {
            self.active.insert(entry.display_id.clone(), handle);
        }
    }

    /// Current bounds of a window, for parent clamping.
    pub fn window_bounds(&self, handle: WindowHandle) -> Option<Rect> {
        self.entries.get(&handle).map(|e| e.bounds)
    }

    /// Mirror a window's bounds after it changed them.
    pub fn update_bounds(&mut self, handle: WindowHandle, bounds: Rect) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.bounds = bounds;
        }
    }

    pub fn primary_display_bounds(&self) -> Rect {
        self.primary_display_bounds
    }

    // =========================================================================
    // Restore bounds
    // =========================================================================

    /// Remember the bounds a window should return to on restore. Only the
    /// first capture in a snap sequence wins, so
    /// maximize-then-minimize-then-restore recovers the original bounds.
    pub fn save_restore_bounds(&mut self, handle: WindowHandle, bounds: Rect) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            if entry.saved_bounds.is_none() {
                entry.saved_bounds = Some(bounds);
            }
        }
    }

    /// Consume the saved bounds for a restoring window.
    pub fn take_restore_bounds(&mut self, handle: WindowHandle) -> Option<Rect> {
        self.entries
            .get_mut(&handle)
            .and_then(|e| e.saved_bounds.take())
    }

    // =========================================================================
    // Platform cursor
    // =========================================================================

    pub fn platform_cursor(&self) -> Option<&PlatformCursor> {
        self.platform_cursor.as_ref()
    }

    pub fn set_platform_cursor(&mut self, cursor: Option<PlatformCursor>) {
        self.platform_cursor = cursor;
    }

    // =========================================================================
    // Event grabs
    // =========================================================================

    pub fn grab_events(&mut self, handle: WindowHandle) {
        self.event_grabber = Some(handle);
    }

    pub fn ungrab_events(&mut self, handle: WindowHandle) {
        if self.event_grabber == Some(handle) {
            self.event_grabber = None;
        }
    }

    pub fn event_grabber(&self) -> Option<WindowHandle> {
        self.event_grabber
    }

    pub fn window_count(&self) -> usize {
        self.entries.len()
    }
}
