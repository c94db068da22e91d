#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::core::commands::{DisplayCommand, ImeHiddenType, WindowHandle};
    use crate::core::registry::WindowRegistry;
    use crate::core::transport::RecordingTransport;
    use crate::core::window::cursor::{
        CursorBitmap, CursorDecodeRequest, CursorDecodeResult, CursorImage, CustomCursorType,
        PlatformCursor, CURSOR_HIDE_HOTSPOT, CURSOR_RESTORE_HOTSPOT,
    };
    use crate::core::window::{PlatformWindowType, ShellWindow, WidgetState, WidgetType};
    use crate::platform::api::WindowDelegate;
    use crate::prelude::*;

    // ========================================================================
    // Fixtures
    // ========================================================================

    #[derive(Default)]
    struct RecordingDelegate {
        widgets: Mutex<Vec<WindowHandle>>,
        bounds_changes: Mutex<Vec<Rect>>,
        close_requests: AtomicUsize,
    }

    impl WindowDelegate for RecordingDelegate {
        fn on_widget_available(&self, handle: WindowHandle) {
            self.widgets.lock().unwrap().push(handle);
        }

        fn on_bounds_changed(&self, bounds: Rect) {
            self.bounds_changes.lock().unwrap().push(bounds);
        }

        fn on_close_requested(&self) {
            self.close_requests.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        transport: Arc<RecordingTransport>,
        registry: Arc<RwLock<WindowRegistry>>,
        delegate: Arc<RecordingDelegate>,
    }

    impl Fixture {
        fn new(connected: bool) -> Self {
            Self {
                transport: Arc::new(RecordingTransport::new(connected)),
                registry: Arc::new(RwLock::new(WindowRegistry::new(Rect::new(0, 0, 1920, 1080)))),
                delegate: Arc::new(RecordingDelegate::default()),
            }
        }

        fn window(&self, bounds: Rect) -> ShellWindow {
            ShellWindow::new(
                self.delegate.clone(),
                self.transport.clone(),
                self.registry.clone(),
                bounds,
            )
        }

        /// Register a plain parent window entry and return its handle.
        fn parent(&self, bounds: Rect) -> WindowHandle {
            let mut registry = self.registry.write().unwrap();
            let handle = registry.next_handle();
            registry.on_window_created(handle, "", bounds);
            handle
        }

        fn sent(&self) -> Vec<DisplayCommand> {
            self.transport.take_sent()
        }
    }

    fn cursor_png() -> tempfile::NamedTempFile {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file
    }

    fn platform_cursor(id: u32) -> PlatformCursor {
        PlatformCursor {
            id,
            bitmap: CursorBitmap::single(
                CursorImage {
                    width: 1,
                    height: 1,
                    pixels: vec![0, 0, 0, 255],
                },
                Point::new(0, 0),
            ),
        }
    }

    // ========================================================================
    // Bounds clamping
    // ========================================================================

    #[test]
    fn test_popup_clamped_into_parent_on_init() {
        let fixture = Fixture::new(false);
        let parent = fixture.parent(Rect::new(0, 0, 300, 300));

        let mut window = fixture.window(Rect::new(350, 10, 50, 50));
        window.init(PlatformWindowType::Popup, Some(parent));

        // x = 350; right edge 400 exceeds parent width 300, pulled back 100
        assert_eq!(window.bounds(), Rect::new(250, 10, 50, 50));
        assert_eq!(window.widget_type(), WidgetType::Popup);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let fixture = Fixture::new(false);
        let parent = fixture.parent(Rect::new(0, 0, 300, 300));

        // Tooltips re-clamp on every bounds change.
        let mut window = fixture.window(Rect::new(0, 0, 50, 50));
        window.init(PlatformWindowType::Tooltip, Some(parent));

        window.set_bounds(Rect::new(350, 400, 50, 50));
        let once = window.bounds();
        window.set_bounds(once);
        assert_eq!(window.bounds(), once);
    }

    #[test]
    fn test_clamp_noop_for_window_inside_parent() {
        let fixture = Fixture::new(false);
        let parent = fixture.parent(Rect::new(0, 0, 300, 300));

        let mut window = fixture.window(Rect::new(10, 20, 50, 50));
        window.init(PlatformWindowType::Popup, Some(parent));

        assert_eq!(window.bounds(), Rect::new(10, 20, 50, 50));
    }

    #[test]
    fn test_clamp_compares_relative_coordinate_against_parent_origin() {
        // Historical quirk, preserved: the floor clamp tests the
        // parent-relative coordinate against the parent's absolute origin
        // rather than zero. A child sitting just inside a parent whose
        // origin is far from (0,0) therefore snaps to (parent.x, parent.y)
        // in parent-relative terms.
        let fixture = Fixture::new(false);
        let parent = fixture.parent(Rect::new(100, 100, 300, 300));

        let mut window = fixture.window(Rect::new(120, 120, 50, 50));
        window.init(PlatformWindowType::Popup, Some(parent));

        // x = 120 - 100 = 20, and 20 < 100, so x snaps to 100 (not 0)
        assert_eq!(window.bounds(), Rect::new(100, 100, 50, 50));
    }

    #[test]
    fn test_clamp_skipped_without_parent() {
        let fixture = Fixture::new(false);

        let mut window = fixture.window(Rect::new(350, 10, 50, 50));
        window.init(PlatformWindowType::Popup, None);

        // No parent and no active window: clamp is a logged no-op.
        assert_eq!(window.parent(), None);
        assert_eq!(window.bounds(), Rect::new(350, 10, 50, 50));
    }

    #[test]
    fn test_popup_adopts_active_window_as_parent() {
        let fixture = Fixture::new(false);
        let parent = fixture.parent(Rect::new(0, 0, 300, 300));
        fixture.registry.write().unwrap().set_active_window(parent);

        let mut window = fixture.window(Rect::new(10, 10, 50, 50));
        window.init(PlatformWindowType::Popup, None);

        assert_eq!(window.parent(), Some(parent));
    }

    #[test]
    fn test_tooltip_init_pins_origin() {
        let fixture = Fixture::new(false);
        let parent = fixture.parent(Rect::new(0, 0, 300, 300));

        let mut window = fixture.window(Rect::new(40, 40, 80, 30));
        window.init(PlatformWindowType::Tooltip, Some(parent));

        assert_eq!(window.bounds(), Rect::new(0, 0, 80, 30));
        assert_eq!(window.widget_type(), WidgetType::Tooltip);
    }

    // ========================================================================
    // Widget state
    // ========================================================================

    #[test]
    fn test_show_sends_state_when_connected() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        window.show();
        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::State {
                handle: window.handle(),
                state: WidgetState::Show,
            }]
        );
    }

    #[test]
    fn test_show_disconnected_sends_nothing() {
        let fixture = Fixture::new(false);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));

        window.show();
        assert_eq!(fixture.transport.sent_count(), 0);
        assert_eq!(window.widget_state(), WidgetState::Show);
    }

    #[test]
    fn test_hide_tooltip_requests_close_without_state() {
        let fixture = Fixture::new(true);
        let parent = fixture.parent(Rect::new(0, 0, 300, 300));

        let mut window = fixture.window(Rect::new(0, 0, 80, 30));
        window.init(PlatformWindowType::Tooltip, Some(parent));
        fixture.sent();

        window.hide();
        assert_eq!(fixture.delegate.close_requests.load(Ordering::SeqCst), 1);
        assert_eq!(window.widget_state(), WidgetState::Hide);
        assert!(fixture
            .sent()
            .iter()
            .all(|c| !matches!(c, DisplayCommand::State { .. })));
    }

    #[test]
    fn test_hide_window_sends_state() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        window.init(PlatformWindowType::Window, None);
        fixture.sent();

        window.hide();
        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::State {
                handle: window.handle(),
                state: WidgetState::Hide,
            }]
        );
        assert_eq!(fixture.delegate.close_requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fullscreen_snaps_to_primary_display() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(10, 10, 100, 100));
        window.init(PlatformWindowType::Window, None);
        fixture.sent();

        window.toggle_fullscreen();
        assert_eq!(window.bounds(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(window.widget_state(), WidgetState::Fullscreen);
    }

    #[test]
    fn test_fullscreen_with_size_zero_area_degrades() {
        let fixture = Fixture::new(false);
        let mut window = fixture.window(Rect::new(10, 10, 100, 100));
        window.init(PlatformWindowType::Window, None);

        window.toggle_fullscreen_with_size(Size::new(1280, 0));
        // Degrades to display-sized fullscreen
        assert_eq!(window.bounds(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(window.widget_state(), WidgetState::Fullscreen);
    }

    #[test]
    fn test_fullscreen_with_size_uses_given_size() {
        let fixture = Fixture::new(false);
        let mut window = fixture.window(Rect::new(10, 10, 100, 100));

        window.toggle_fullscreen_with_size(Size::new(1280, 720));
        assert_eq!(window.bounds(), Rect::new(0, 0, 1280, 720));
    }

    #[test]
    fn test_minimize_empties_bounds() {
        let fixture = Fixture::new(false);
        let mut window = fixture.window(Rect::new(10, 10, 100, 100));

        window.minimize();
        assert!(window.bounds().is_empty());
        assert_eq!(window.widget_state(), WidgetState::Minimized);
    }

    #[test]
    fn test_restore_recovers_pre_snap_bounds() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(10, 20, 300, 200));
        window.init(PlatformWindowType::Window, None);
        fixture.sent();

        window.maximize();
        window.minimize();
        window.restore();

        assert_eq!(window.bounds(), Rect::new(10, 20, 300, 200));
        assert_eq!(window.widget_state(), WidgetState::Restore);
    }

    #[test]
    fn test_set_bounds_origin_change_sends_move() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        window.init(PlatformWindowType::Window, None);
        fixture.sent();

        window.set_bounds(Rect::new(50, 60, 100, 100));
        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::MoveWindow {
                handle: window.handle(),
                parent: None,
                widget_type: WidgetType::Window,
                bounds: Rect::new(50, 60, 100, 100),
            }]
        );
    }

    #[test]
    fn test_set_bounds_size_change_only_skips_move() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(10, 10, 100, 100));
        fixture.sent();

        window.set_bounds(Rect::new(10, 10, 640, 480));
        assert_eq!(fixture.transport.sent_count(), 0);
        // Delegate still hears about it
        assert_eq!(
            fixture.delegate.bounds_changes.lock().unwrap().last(),
            Some(&Rect::new(10, 10, 640, 480))
        );
    }

    // ========================================================================
    // Deferred sync
    // ========================================================================

    #[test]
    fn test_deferred_sync_replays_fixed_order_once() {
        let fixture = Fixture::new(false);
        let mut window = fixture.window(Rect::new(0, 0, 200, 200));

        // Mutate freely while disconnected.
        window.init(PlatformWindowType::Window, None);
        window.set_title("hello");
        window.set_window_shape(&[Rect::new(10, 10, 50, 50)]);
        window.show();
        window.maximize();
        assert_eq!(fixture.transport.sent_count(), 0);

        fixture.transport.set_connected(true);
        window.on_transport_connected();

        let handle = window.handle();
        assert_eq!(
            fixture.sent(),
            vec![
                DisplayCommand::Create { handle },
                DisplayCommand::InitWindow {
                    handle,
                    parent: None,
                    bounds: Rect::new(0, 0, 1920, 1080),
                    widget_type: WidgetType::Window,
                },
                // Only the latest state is replayed, not each intermediate.
                DisplayCommand::State {
                    handle,
                    state: WidgetState::Maximized,
                },
                DisplayCommand::Title {
                    handle,
                    title: "hello".to_string(),
                },
                DisplayCommand::AddRegion {
                    handle,
                    rect: Rect::new(10, 10, 50, 50),
                },
            ]
        );
    }

    #[test]
    fn test_deferred_sync_on_fresh_window_sends_create_only() {
        let fixture = Fixture::new(false);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));

        fixture.transport.set_connected(true);
        window.on_transport_connected();

        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::Create {
                handle: window.handle()
            }]
        );
    }

    // ========================================================================
    // Cursor reconciliation
    // ========================================================================

    #[test]
    fn test_blank_cursor_sends_hide_sentinel() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        window.set_custom_cursor(CustomCursorType::Blank, "", Point::new(0, 0), false);
        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::CursorSet {
                images: Vec::new(),
                hotspot: CURSOR_HIDE_HOTSPOT,
            }]
        );
    }

    #[test]
    fn test_redundant_cursor_request_is_noop() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        window.set_custom_cursor(CustomCursorType::Blank, "", Point::new(0, 0), false);
        fixture.sent();

        // Same non-Path type, no platform override pending: nothing sent.
        window.set_custom_cursor(CustomCursorType::Blank, "", Point::new(0, 0), false);
        assert_eq!(fixture.transport.sent_count(), 0);
    }

    #[test]
    fn test_cursor_overriding_lock_is_one_way() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        window.set_custom_cursor(CustomCursorType::Blank, "", Point::new(0, 0), true);
        fixture.sent();

        // Unprivileged attempt to drop the app-wide cursor: refused.
        window.set_custom_cursor(CustomCursorType::NotUse, "", Point::new(0, 0), false);
        assert_eq!(fixture.transport.sent_count(), 0);

        // The same request with overriding kept allowed goes through.
        window.set_custom_cursor(CustomCursorType::NotUse, "", Point::new(0, 0), true);
        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::CursorSet {
                images: Vec::new(),
                hotspot: CURSOR_RESTORE_HOTSPOT,
            }]
        );
    }

    #[test]
    fn test_path_cursor_decodes_and_sends() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        let file = cursor_png();
        window.set_custom_cursor(
            CustomCursorType::Path,
            file.path().to_str().unwrap(),
            Point::new(4, 4),
            true,
        );

        // Decode runs on a worker; pump until the completion lands.
        for _ in 0..200 {
            window.pump_cursor_tasks();
            if fixture.transport.sent_count() > 0 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let sent = fixture.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            DisplayCommand::CursorSet { images, hotspot } => {
                assert_eq!(images.len(), 1);
                assert_eq!(images[0].width, 4);
                assert_eq!(*hotspot, Point::new(4, 4));
            }
            other => panic!("expected CursorSet, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_decode_result_dropped() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        window.apply_decoded_cursor(CursorDecodeResult {
            request: CursorDecodeRequest {
                generation: 99,
                cursor_type: CustomCursorType::Path,
                hotspot: Point::new(0, 0),
                allow_overriding: false,
            },
            image: Some(CursorImage {
                width: 1,
                height: 1,
                pixels: vec![0, 0, 0, 255],
            }),
        });

        assert_eq!(fixture.transport.sent_count(), 0);
    }

    #[test]
    fn test_missing_decode_image_restores_default_cursor() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        // Bump the generation the way a real request would.
        window.set_custom_cursor(CustomCursorType::Path, "/nonexistent.png", Point::new(0, 0), false);
        fixture.sent();

        window.apply_decoded_cursor(CursorDecodeResult {
            request: CursorDecodeRequest {
                generation: 1,
                cursor_type: CustomCursorType::Path,
                hotspot: Point::new(0, 0),
                allow_overriding: false,
            },
            image: None,
        });

        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::CursorSet {
                images: Vec::new(),
                hotspot: CURSOR_RESTORE_HOTSPOT,
            }]
        );
    }

    #[test]
    fn test_set_cursor_refused_while_override_locked() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        window.set_custom_cursor(CustomCursorType::Blank, "", Point::new(0, 0), true);
        fixture.sent();

        window.set_cursor(&platform_cursor(7));
        assert_eq!(fixture.transport.sent_count(), 0);
        assert!(fixture.registry.read().unwrap().platform_cursor().is_none());
    }

    #[test]
    fn test_set_cursor_skips_already_installed() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        let cursor = platform_cursor(7);
        window.set_cursor(&cursor);
        fixture.sent();

        window.set_cursor(&cursor);
        assert_eq!(fixture.transport.sent_count(), 0);
    }

    // ========================================================================
    // Region and opacity
    // ========================================================================

    #[test]
    fn test_shape_advertises_clipped_bounding_box() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        // Second rect pokes out of the window and is clipped.
        window.set_window_shape(&[Rect::new(10, 10, 20, 20), Rect::new(80, 80, 50, 50)]);
        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::AddRegion {
                handle: window.handle(),
                rect: Rect::new(10, 10, 90, 90),
            }]
        );
    }

    #[test]
    fn test_opacity_roundtrip_restores_region_box() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        window.set_window_shape(&[Rect::new(10, 10, 50, 50)]);
        let added = fixture.sent();
        assert_eq!(added.len(), 1);

        window.set_opacity(0.5);
        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::SubRegion {
                handle: window.handle(),
                rect: Rect::new(10, 10, 50, 50),
            }]
        );

        window.set_opacity(1.0);
        assert_eq!(fixture.sent(), added);
    }

    #[test]
    fn test_shape_while_transparent_builds_nothing() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        window.set_opacity(0.5);
        fixture.sent();

        window.set_window_shape(&[Rect::new(10, 10, 50, 50)]);
        assert_eq!(fixture.transport.sent_count(), 0);

        // Region was never built, so opacity back to 1.0 re-adds nothing.
        window.set_opacity(1.0);
        assert_eq!(fixture.transport.sent_count(), 0);
    }

    #[test]
    fn test_repeated_opacity_changes_are_idempotent() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        window.set_window_shape(&[Rect::new(0, 0, 100, 100)]);
        fixture.sent();

        window.set_opacity(0.3);
        window.set_opacity(0.7);
        let sent = fixture.sent();
        // Only the first transparency transition withdraws the region.
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent[0], DisplayCommand::SubRegion { .. }));
    }

    // ========================================================================
    // Pass-throughs and lifecycle
    // ========================================================================

    #[test]
    fn test_passthroughs_bypass_connection_gate() {
        let fixture = Fixture::new(false);
        let window = fixture.window(Rect::new(0, 0, 100, 100));

        // Each of these reaches the transport even though it is down;
        // the transport itself drops them.
        window.show_input_panel();
        window.hide_input_panel(ImeHiddenType::Deactivate);
        window.request_drag_data("text/plain");
        window.move_cursor_to(Point::new(5, 5));
        assert_eq!(fixture.transport.dropped_count(), 4);
        assert_eq!(fixture.transport.sent_count(), 0);
    }

    #[test]
    fn test_display_affinity_property_reroutes_window() {
        let fixture = Fixture::new(true);
        let mut window = fixture.window(Rect::new(0, 0, 100, 100));
        fixture.sent();

        window.set_window_property("displayAffinity", "display-2");
        assert_eq!(window.display_id(), "display-2");
        assert_eq!(
            fixture.sent(),
            vec![DisplayCommand::SetWindowProperty {
                handle: window.handle(),
                name: "displayAffinity".to_string(),
                value: "display-2".to_string(),
            }]
        );
    }

    #[test]
    fn test_capture_routes_through_registry() {
        let fixture = Fixture::new(false);
        let window = fixture.window(Rect::new(0, 0, 100, 100));

        window.set_capture();
        assert_eq!(
            fixture.registry.read().unwrap().event_grabber(),
            Some(window.handle())
        );
        window.release_capture();
        assert_eq!(fixture.registry.read().unwrap().event_grabber(), None);
        assert!(!window.has_capture());
    }

    #[test]
    fn test_drop_sends_destroy_and_unregisters() {
        let fixture = Fixture::new(true);
        let window = fixture.window(Rect::new(0, 0, 100, 100));
        let handle = window.handle();
        fixture.sent();

        drop(window);
        assert_eq!(fixture.sent(), vec![DisplayCommand::DestroyWindow { handle }]);
        assert_eq!(fixture.registry.read().unwrap().window_count(), 0);
    }

    #[test]
    fn test_construction_announces_widget() {
        let fixture = Fixture::new(false);
        let window = fixture.window(Rect::new(0, 0, 100, 100));

        assert_eq!(
            fixture.delegate.widgets.lock().unwrap().as_slice(),
            &[window.handle()]
        );
        assert_eq!(fixture.registry.read().unwrap().window_count(), 1);
    }
}
