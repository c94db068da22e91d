//! Platform window backed by a remote compositor.
//!
//! `ShellWindow` tracks a window's visual state locally and forwards it to
//! the compositor as one-way commands. State-bearing commands are only
//! sent while the transport is connected; on the connected transition a
//! single deferred sync replays the accumulated state in a fixed order
//! (create, init, state, title, region, cursor).
//!
//! All mutation happens on the control thread. The only background work is
//! the custom-cursor bitmap decode, whose completions the host applies by
//! pumping `pump_cursor_tasks()`.

use crate::core::commands::{
    DisplayCommand, ImeHiddenType, KeyMask, LocationHint, TextInputInfo, WindowGroupConfiguration,
    WindowHandle, XInputEventType, XInputKeySymbolType,
};
use crate::core::registry::WindowRegistry;
use crate::core::transport::CommandSink;
use crate::core::window::cursor::{
    self, CursorBitmap, CursorDecodeRequest, CursorDecodeResult, CursorTaskQueue,
    CustomCursorType, PlatformCursor, CURSOR_HIDE_HOTSPOT, CURSOR_RESTORE_HOTSPOT,
};
use crate::core::window::region::ClipRegion;
use crate::platform::api::WindowDelegate;
use crate::prelude::*;

// ============================================================================
// Window Types
// ============================================================================

/// Window role requested by the host at init time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformWindowType {
    Window,
    WindowFrameless,
    Popup,
    Menu,
    Tooltip,
    Bubble,
}

/// Role the window assumed after init.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetType {
    #[default]
    Frameless,
    Window,
    Popup,
    Tooltip,
}

/// Visual state as last requested by the host. Last write wins; legal
/// transitions are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    #[default]
    Uninitialized,
    Show,
    Hide,
    Fullscreen,
    Maximized,
    Minimized,
    Restore,
}

// ============================================================================
// ShellWindow
// ============================================================================

/// A platform window whose rendering lives in a remote compositor.
pub struct ShellWindow {
    handle: WindowHandle,
    delegate: Arc<dyn WindowDelegate>,
    sink: Arc<dyn CommandSink>,
    registry: Arc<RwLock<WindowRegistry>>,

    bounds: Rect,
    title: String,
    display_id: String,
    transparent: bool,
    resize_enabled: bool,
    parent: Option<WindowHandle>,
    widget_type: WidgetType,
    widget_state: WidgetState,
    region: Option<ClipRegion>,
    init_requested: bool,

    cursor_type: CustomCursorType,
    allow_cursor_overriding: bool,
    cursor_bitmap: Option<CursorBitmap>,
    decode_generation: u32,
    cursor_tasks: CursorTaskQueue,
}

impl ShellWindow {
    /// Create a window. The handle is allocated by the registry and handed
    /// to the delegate before anything is sent to the compositor.
    pub fn new(
        delegate: Arc<dyn WindowDelegate>,
        sink: Arc<dyn CommandSink>,
        registry: Arc<RwLock<WindowRegistry>>,
        bounds: Rect,
    ) -> Self {
        let handle = registry.write().unwrap().next_handle();
        delegate.on_widget_available(handle);

        let display_id = String::new();
        registry
            .write()
            .unwrap()
            .on_window_created(handle, &display_id, bounds);

        Self {
            handle,
            delegate,
            sink,
            registry,
            bounds,
            title: String::new(),
            display_id,
            transparent: false,
            resize_enabled: true,
            parent: None,
            widget_type: WidgetType::default(),
            widget_state: WidgetState::default(),
            region: None,
            init_requested: false,
            cursor_type: CustomCursorType::default(),
            allow_cursor_overriding: false,
            cursor_bitmap: None,
            decode_generation: 0,
            cursor_tasks: CursorTaskQueue::new(),
        }
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    pub fn widget_state(&self) -> WidgetState {
        self.widget_state
    }

    pub fn display_id(&self) -> &str {
        &self.display_id
    }

    pub fn parent(&self) -> Option<WindowHandle> {
        self.parent
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Assign the window its role and parentage.
    ///
    /// Popups and tooltips without an explicit parent adopt the active
    /// window on their display. Popups are clamped into the parent right
    /// away; tooltips are pinned to the parent origin and clamped on every
    /// later bounds change.
    pub fn init(&mut self, window_type: PlatformWindowType, parent: Option<WindowHandle>) {
        match window_type {
            PlatformWindowType::Popup | PlatformWindowType::Menu => {
                self.parent = parent.or_else(|| self.active_window());
                self.widget_type = WidgetType::Popup;
                self.validate_bounds();
            }
            PlatformWindowType::Tooltip => {
                self.parent = parent.or_else(|| self.active_window());
                self.widget_type = WidgetType::Tooltip;
                self.bounds.set_origin(Point::new(0, 0));
            }
            PlatformWindowType::Window | PlatformWindowType::Bubble => {
                self.parent = None;
                self.widget_type = WidgetType::Window;
            }
            PlatformWindowType::WindowFrameless => {
                tracing::debug!("frameless window init not implemented");
            }
        }
        self.sync_bounds_to_registry();

        self.init_requested = true;

        if !self.sink.is_connected() {
            return;
        }
        self.sink.send(DisplayCommand::InitWindow {
            handle: self.handle,
            parent: self.parent,
            bounds: self.bounds,
            widget_type: self.widget_type,
        });
    }

    fn active_window(&self) -> Option<WindowHandle> {
        self.registry.read().unwrap().active_window(&self.display_id)
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    /// Change the window's bounds. Tooltips are re-clamped against their
    /// parent; an origin change is forwarded as `MoveWindow` when
    /// connected; the delegate always hears about the final bounds.
    pub fn set_bounds(&mut self, bounds: Rect) {
        let original_origin = self.bounds.origin();
        self.bounds = bounds;
        if self.widget_type == WidgetType::Tooltip {
            self.validate_bounds();
        }
        self.sync_bounds_to_registry();

        if original_origin != self.bounds.origin() && self.sink.is_connected() {
            self.sink.send(DisplayCommand::MoveWindow {
                handle: self.handle,
                parent: self.parent,
                widget_type: self.widget_type,
                bounds: self.bounds,
            });
        }

        self.delegate.on_bounds_changed(self.bounds);
    }

    /// Clamp the window's origin so it lies inside its parent.
    ///
    /// Skipped (logged, not an error) when the window has no parent or the
    /// parent is unknown.
    fn validate_bounds(&mut self) {
        let Some(parent) = self.parent else {
            tracing::info!("validate bounds skipped, window {} has no parent", self.handle);
            return;
        };
        let Some(parent_bounds) = self.registry.read().unwrap().window_bounds(parent) else {
            tracing::info!("validate bounds skipped, parent {} is unknown", parent);
            return;
        };

        let mut x = self.bounds.x - parent_bounds.x;
        let mut y = self.bounds.y - parent_bounds.y;

        // Historical quirk, kept intentionally: the floor clamp compares the
        // parent-relative coordinate against the parent's absolute origin,
        // not zero.
        if x < parent_bounds.x {
            x = parent_bounds.x;
        } else {
            let right = x + self.bounds.width;
            if right > parent_bounds.width {
                x -= right - parent_bounds.width;
            }
        }

        if y < parent_bounds.y {
            y = parent_bounds.y;
        } else {
            let bottom = y + self.bounds.height;
            if bottom > parent_bounds.height {
                y -= bottom - parent_bounds.height;
            }
        }

        self.bounds.set_origin(Point::new(x, y));
    }

    fn sync_bounds_to_registry(&self) {
        self.registry
            .write()
            .unwrap()
            .update_bounds(self.handle, self.bounds);
    }

    // =========================================================================
    // Widget state
    // =========================================================================

    pub fn show(&mut self) {
        self.widget_state = WidgetState::Show;
        self.send_widget_state();
    }

    /// Hide the window. Tooltips are destroyed rather than hidden: the
    /// delegate is asked to close the window and no state is sent.
    pub fn hide(&mut self) {
        self.widget_state = WidgetState::Hide;

        if self.widget_type == WidgetType::Tooltip {
            self.delegate.on_close_requested();
        } else {
            self.send_widget_state();
        }
    }

    pub fn close(&mut self) {
        self.registry.write().unwrap().on_window_closed(self.handle);
    }

    pub fn toggle_fullscreen(&mut self) {
        let display = self.registry.read().unwrap().primary_display_bounds();
        self.save_restore_bounds();
        self.set_bounds(display);
        self.widget_state = WidgetState::Fullscreen;
        self.send_widget_state();
    }

    /// Fullscreen at an explicit size; a zero-area size degrades to the
    /// display-sized variant.
    pub fn toggle_fullscreen_with_size(&mut self, size: Size) {
        if size.is_empty() {
            self.toggle_fullscreen();
            return;
        }
        self.save_restore_bounds();
        self.set_bounds(Rect::from_size(size));
        self.widget_state = WidgetState::Fullscreen;
        self.send_widget_state();
    }

    pub fn maximize(&mut self) {
        let display = self.registry.read().unwrap().primary_display_bounds();
        self.save_restore_bounds();
        self.set_bounds(display);
        self.widget_state = WidgetState::Maximized;
        self.send_widget_state();
    }

    pub fn minimize(&mut self) {
        self.save_restore_bounds();
        self.set_bounds(Rect::default());
        self.widget_state = WidgetState::Minimized;
        self.send_widget_state();
    }

    /// Leave a snapped state. Bounds recovery goes through the registry,
    /// which remembers the bounds captured before the first snap.
    pub fn restore(&mut self) {
        let saved = self.registry.write().unwrap().take_restore_bounds(self.handle);
        if let Some(bounds) = saved {
            self.set_bounds(bounds);
        }
        self.widget_state = WidgetState::Restore;
        self.send_widget_state();
    }

    fn save_restore_bounds(&self) {
        self.registry
            .write()
            .unwrap()
            .save_restore_bounds(self.handle, self.bounds);
    }

    fn send_widget_state(&self) {
        if !self.sink.is_connected() {
            return;
        }
        self.sink.send(DisplayCommand::State {
            handle: self.handle,
            state: self.widget_state,
        });
    }

    // =========================================================================
    // Title
    // =========================================================================

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        if !self.sink.is_connected() {
            return;
        }
        self.sink.send(DisplayCommand::Title {
            handle: self.handle,
            title: self.title.clone(),
        });
    }

    // =========================================================================
    // Region and opacity
    // =========================================================================

    /// Install a window shape. The previous region is withdrawn; while
    /// transparent no new region is built. Only the bounding box of the
    /// clipped shape is advertised.
    pub fn set_window_shape(&mut self, shape: &[Rect]) {
        self.clear_region();
        if self.transparent {
            return;
        }
        let clip = Rect::from_size(self.bounds.size());
        self.region = Some(ClipRegion::from_shape(shape, clip));
        self.add_region();
    }

    /// Binary transparency: full opacity re-advertises a kept region, any
    /// other value withdraws it. The region data itself survives the round
    /// trip so the re-advertised box is exact.
    pub fn set_opacity(&mut self, opacity: f32) {
        if opacity == 1.0 {
            if self.transparent {
                self.transparent = false;
                self.add_region();
            }
        } else if !self.transparent {
            self.withdraw_region();
            self.transparent = true;
        }
    }

    fn add_region(&self) {
        if !self.sink.is_connected() || self.transparent {
            return;
        }
        if let Some(region) = &self.region {
            if !region.is_empty() {
                self.sink.send(DisplayCommand::AddRegion {
                    handle: self.handle,
                    rect: region.bounds(),
                });
            }
        }
    }

    /// Withdraw the advertised region, keeping the data. No-op while
    /// transparent: a transparent window has nothing advertised.
    fn withdraw_region(&self) {
        if self.transparent {
            return;
        }
        if let Some(region) = &self.region {
            if self.sink.is_connected() && !region.is_empty() {
                self.sink.send(DisplayCommand::SubRegion {
                    handle: self.handle,
                    rect: region.bounds(),
                });
            }
        }
    }

    fn clear_region(&mut self) {
        self.withdraw_region();
        self.region = None;
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    /// Install a standard platform cursor. Refused while a custom cursor
    /// override is locked in, or when the same cursor is already installed.
    pub fn set_cursor(&mut self, cursor: &PlatformCursor) {
        {
            let registry = self.registry.read().unwrap();
            if self.allow_cursor_overriding
                || registry.platform_cursor().map(|c| c.id) == Some(cursor.id)
            {
                return;
            }
        }

        self.cursor_bitmap = Some(cursor.bitmap.clone());
        self.registry
            .write()
            .unwrap()
            .set_platform_cursor(Some(cursor.clone()));
        if !self.sink.is_connected() {
            return;
        }
        self.send_cursor();
    }

    /// Request a custom cursor.
    ///
    /// Two states exist: each element may use its own cursor, or one
    /// cursor serves the whole application. Switching from the first to
    /// the second is the only valid direction, so a request that would
    /// globally unlock overriding is refused. Identical non-bitmap
    /// requests with no platform override pending are idempotent.
    pub fn set_custom_cursor(
        &mut self,
        cursor_type: CustomCursorType,
        path: &str,
        hotspot: Point,
        allow_overriding: bool,
    ) {
        if self.allow_cursor_overriding && !allow_overriding {
            return;
        }
        if cursor_type != CustomCursorType::Path
            && cursor_type == self.cursor_type
            && self.registry.read().unwrap().platform_cursor().is_none()
        {
            return;
        }

        self.cursor_type = cursor_type;
        self.registry.write().unwrap().set_platform_cursor(None);
        self.allow_cursor_overriding = allow_overriding;

        match cursor_type {
            CustomCursorType::Path => {
                self.decode_generation = self.decode_generation.wrapping_add(1);
                let request = CursorDecodeRequest {
                    generation: self.decode_generation,
                    cursor_type,
                    hotspot,
                    allow_overriding,
                };
                cursor::spawn_decode(path.to_string(), request, self.cursor_tasks.clone());
            }
            CustomCursorType::Blank => {
                self.send_cursor_clear(CURSOR_HIDE_HOTSPOT);
                self.cursor_bitmap = None;
            }
            CustomCursorType::NotUse => {
                self.send_cursor_clear(CURSOR_RESTORE_HOTSPOT);
                self.cursor_bitmap = None;
            }
        }
    }

    /// Apply decode completions posted by cursor workers. Call from the
    /// control thread's task pump.
    pub fn pump_cursor_tasks(&mut self) {
        for result in self.cursor_tasks.take_all() {
            self.apply_decoded_cursor(result);
        }
    }

    /// Apply one decode completion. Stale generations are dropped; a
    /// missing image falls back to restoring the default cursor.
    pub fn apply_decoded_cursor(&mut self, result: CursorDecodeResult) {
        if result.request.generation != self.decode_generation {
            tracing::debug!(
                "dropping stale cursor decode (generation {}, current {})",
                result.request.generation,
                self.decode_generation
            );
            return;
        }

        let Some(image) = result.image else {
            self.set_custom_cursor(
                CustomCursorType::NotUse,
                "",
                Point::default(),
                result.request.allow_overriding,
            );
            return;
        };

        self.cursor_bitmap = Some(CursorBitmap::single(image, result.request.hotspot));
        self.registry.write().unwrap().set_platform_cursor(None);
        if self.sink.is_connected() {
            self.send_cursor();
        }
    }

    /// Re-send the current cursor: the installed bitmap if any, otherwise
    /// the hide/restore sentinel matching the custom cursor type.
    pub fn reset_custom_cursor(&self) {
        if !self.sink.is_connected() {
            return;
        }
        if self.cursor_bitmap.is_some() {
            self.send_cursor();
        } else if self.cursor_type == CustomCursorType::Blank {
            self.sink.send(DisplayCommand::CursorSet {
                images: Vec::new(),
                hotspot: CURSOR_HIDE_HOTSPOT,
            });
        } else {
            self.sink.send(DisplayCommand::CursorSet {
                images: Vec::new(),
                hotspot: CURSOR_RESTORE_HOTSPOT,
            });
        }
    }

    fn send_cursor(&self) {
        match &self.cursor_bitmap {
            Some(bitmap) => self.sink.send(DisplayCommand::CursorSet {
                images: bitmap.frames.clone(),
                hotspot: bitmap.hotspot,
            }),
            None => self.sink.send(DisplayCommand::CursorSet {
                images: Vec::new(),
                hotspot: Point::default(),
            }),
        }
    }

    fn send_cursor_clear(&self, hotspot: Point) {
        if !self.sink.is_connected() {
            return;
        }
        self.sink.send(DisplayCommand::CursorSet {
            images: Vec::new(),
            hotspot,
        });
    }

    pub fn move_cursor_to(&self, location: Point) {
        self.sink.send(DisplayCommand::MoveCursor { location });
    }

    pub fn confine_cursor_to_bounds(&self, _bounds: Rect) {}

    // =========================================================================
    // Deferred sync
    // =========================================================================

    /// Replay accumulated state after the transport (re)connects.
    ///
    /// Fixed order: create, init-window (if requested), state (if not
    /// uninitialized), title (if non-empty), region, cursor (if a bitmap
    /// is installed). Called once per connected transition by the host.
    pub fn on_transport_connected(&mut self) {
        if self.sink.is_connected() {
            self.deferred_sync();
        }
    }

    /// The transport went away. Nothing to do locally; state keeps
    /// accumulating until the next connected transition.
    pub fn on_transport_disconnected(&mut self) {}

    fn deferred_sync(&mut self) {
        self.sink.send(DisplayCommand::Create { handle: self.handle });

        if self.init_requested {
            self.sink.send(DisplayCommand::InitWindow {
                handle: self.handle,
                parent: self.parent,
                bounds: self.bounds,
                widget_type: self.widget_type,
            });
        }

        if self.widget_state != WidgetState::Uninitialized {
            self.sink.send(DisplayCommand::State {
                handle: self.handle,
                state: self.widget_state,
            });
        }

        if !self.title.is_empty() {
            self.sink.send(DisplayCommand::Title {
                handle: self.handle,
                title: self.title.clone(),
            });
        }

        self.add_region();
        if self.cursor_bitmap.is_some() {
            self.send_cursor();
        }
    }

    // =========================================================================
    // Capture
    // =========================================================================

    pub fn set_capture(&self) {
        self.registry.write().unwrap().grab_events(self.handle);
    }

    pub fn release_capture(&self) {
        self.registry.write().unwrap().ungrab_events(self.handle);
    }

    pub fn has_capture(&self) -> bool {
        false
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Forward a window property. `displayAffinity` additionally reroutes
    /// the window between displays in the registry.
    pub fn set_window_property(&mut self, name: &str, value: &str) {
        if name == "displayAffinity" && self.display_id != value {
            let prev = std::mem::replace(&mut self.display_id, value.to_string());
            self.registry
                .write()
                .unwrap()
                .on_window_display_changed(&prev, value, self.handle);
        }

        self.sink.send(DisplayCommand::SetWindowProperty {
            handle: self.handle,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn set_resize_enabled(&mut self, enabled: bool) {
        self.resize_enabled = enabled;
    }

    pub fn resize_enabled(&self) -> bool {
        self.resize_enabled
    }

    pub fn set_location_hint(&self, hint: LocationHint) {
        self.sink.send(DisplayCommand::SetLocationHint {
            handle: self.handle,
            hint,
        });
    }

    // =========================================================================
    // Window groups
    // =========================================================================

    pub fn create_group(&self, config: WindowGroupConfiguration) {
        self.sink.send(DisplayCommand::CreateWindowGroup {
            handle: self.handle,
            config,
        });
    }

    pub fn attach_to_group(&self, group: &str, layer: &str) {
        self.sink.send(DisplayCommand::AttachToWindowGroup {
            handle: self.handle,
            group: group.to_string(),
            layer: layer.to_string(),
        });
    }

    pub fn focus_group_owner(&self) {
        self.sink
            .send(DisplayCommand::FocusWindowGroupOwner { handle: self.handle });
    }

    pub fn focus_group_layer(&self) {
        self.sink
            .send(DisplayCommand::FocusWindowGroupLayer { handle: self.handle });
    }

    pub fn detach_group(&self) {
        self.sink
            .send(DisplayCommand::DetachWindowGroup { handle: self.handle });
    }

    // =========================================================================
    // Input panel and text input
    // =========================================================================

    pub fn show_input_panel(&self) {
        self.sink
            .send(DisplayCommand::ShowInputPanel { handle: self.handle });
    }

    pub fn hide_input_panel(&self, hidden_type: ImeHiddenType) {
        self.sink.send(DisplayCommand::HideInputPanel {
            handle: self.handle,
            hidden_type,
        });
    }

    pub fn set_text_input_info(&self, info: TextInputInfo) {
        self.sink.send(DisplayCommand::TextInputInfo {
            handle: self.handle,
            info,
        });
    }

    pub fn set_surrounding_text(&self, text: &str, cursor_position: usize, anchor_position: usize) {
        self.sink.send(DisplayCommand::SurroundingText {
            handle: self.handle,
            text: text.to_string(),
            cursor_position,
            anchor_position,
        });
    }

    // =========================================================================
    // Drag and drop plumbing
    // =========================================================================

    pub fn request_drag_data(&self, mime_type: &str) {
        self.sink.send(DisplayCommand::RequestDragData {
            mime_type: mime_type.to_string(),
        });
    }

    pub fn request_selection_data(&self, mime_type: &str) {
        self.sink.send(DisplayCommand::RequestSelectionData {
            mime_type: mime_type.to_string(),
        });
    }

    pub fn drag_will_be_accepted(&self, serial: u32, mime_type: &str) {
        self.sink.send(DisplayCommand::DragWillBeAccepted {
            serial,
            mime_type: mime_type.to_string(),
        });
    }

    pub fn drag_will_be_rejected(&self, serial: u32) {
        self.sink
            .send(DisplayCommand::DragWillBeRejected { serial });
    }

    // =========================================================================
    // Injected input
    // =========================================================================

    pub fn x_input_activate(&self, kind: &str) {
        self.sink.send(DisplayCommand::XInputActivate {
            kind: kind.to_string(),
        });
    }

    pub fn x_input_deactivate(&self) {
        self.sink.send(DisplayCommand::XInputDeactivate);
    }

    pub fn x_input_invoke_action(
        &self,
        keysym: u32,
        symbol_type: XInputKeySymbolType,
        event_type: XInputEventType,
    ) {
        self.sink.send(DisplayCommand::XInputInvokeAction {
            keysym,
            symbol_type,
            event_type,
        });
    }

    // =========================================================================
    // Input region and key masks
    // =========================================================================

    pub fn set_input_region(&self, region: Vec<Rect>) {
        self.sink.send(DisplayCommand::SetInputRegion {
            handle: self.handle,
            region,
        });
    }

    pub fn set_group_key_mask(&self, mask: KeyMask) {
        self.sink.send(DisplayCommand::SetGroupKeyMask {
            handle: self.handle,
            mask,
        });
    }

    pub fn set_key_mask(&self, mask: KeyMask, set: bool) {
        self.sink.send(DisplayCommand::SetKeyMask {
            handle: self.handle,
            mask,
            set,
        });
    }

    // =========================================================================
    // Placeholders
    // =========================================================================

    pub fn is_visible(&self) -> bool {
        tracing::debug!("is_visible not implemented, reporting visible");
        true
    }

    pub fn activate(&self) {
        tracing::debug!("activate not implemented");
    }

    pub fn deactivate(&self) {
        tracing::debug!("deactivate not implemented");
    }
}

impl Drop for ShellWindow {
    fn drop(&mut self) {
        self.sink
            .send(DisplayCommand::DestroyWindow { handle: self.handle });
        self.registry.write().unwrap().on_window_closed(self.handle);
    }
}
