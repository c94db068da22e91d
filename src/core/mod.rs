pub mod commands;
pub mod errors;
pub mod registry;
pub mod transport;
pub mod window;

// Re-export key types
pub use commands::{DisplayCommand, WindowHandle};
pub use registry::WindowRegistry;
pub use transport::{CommandSink, RecordingTransport};
pub use window::{PlatformWindowType, ShellWindow, WidgetState, WidgetType};
