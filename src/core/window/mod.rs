pub mod cursor;
pub mod region;
pub mod window;
mod tests;

pub use window::{PlatformWindowType, ShellWindow, WidgetState, WidgetType};
