use std::sync::{Arc, RwLock};

use anyhow::Result;
use mariposa::core::commands::DisplayCommand;
use mariposa::mlog;
use mariposa::util::geometry::{Point, Rect};
use mariposa::util::logging;
use mariposa::{
    PlatformConfig, PlatformWindowType, RecordingTransport, ShellWindow, StubDelegate,
    WindowRegistry,
};

fn main() -> Result<()> {
    // Initialize logging with standardized format
    logging::init();

    let config = PlatformConfig::default();
    let registry = Arc::new(RwLock::new(WindowRegistry::new(
        config.primary_display_bounds,
    )));

    // Start disconnected to demonstrate the deferred-send lifecycle.
    let transport = Arc::new(RecordingTransport::new(false));
    let delegate = Arc::new(StubDelegate);

    let mut window = ShellWindow::new(
        delegate,
        transport.clone(),
        registry,
        Rect::new(100, 100, 800, 600),
    );
    window.init(PlatformWindowType::Window, None);
    window.set_title("mariposa demo");
    window.show();
    window.set_window_shape(&[Rect::new(0, 0, 800, 600)]);

    mlog!(
        logging::MAIN,
        "mutated while disconnected: {} commands dropped",
        transport.dropped_count()
    );

    // Compositor channel comes up; the window replays its state once.
    transport.set_connected(true);
    window.on_transport_connected();

    for command in transport.take_sent() {
        mlog!(logging::MAIN, "replayed: {}", command.name());
    }

    // A live connection sends as it goes.
    window.move_cursor_to(Point::new(400, 300));
    window.maximize();
    let live: Vec<DisplayCommand> = transport.take_sent();
    mlog!(logging::MAIN, "sent live: {} commands", live.len());

    Ok(())
}
