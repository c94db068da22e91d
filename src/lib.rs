// Mariposa
// Copyright (c) 2026
//
// Platform window core for remote compositors
// Windows track their visual state locally and forward it over a one-way
// command transport; while disconnected, state accumulates and is replayed
// once on reconnect.

pub mod config;
pub mod core;
pub mod platform;
pub mod prelude;
pub mod util;

pub use crate::config::PlatformConfig;
pub use crate::core::{
    CommandSink, DisplayCommand, PlatformWindowType, RecordingTransport, ShellWindow,
    WidgetState, WidgetType, WindowHandle, WindowRegistry,
};
pub use crate::platform::{StubDelegate, WindowDelegate};
