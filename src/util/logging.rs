//! Standardized logging utility for Mariposa
//!
//! Core modules log through `tracing`; `init()` installs the standard
//! subscriber with the `YYYY-MM-DD HH:MM:SS` timestamp format. The `mlog!`
//! macro covers the host boundary (binaries, embedders) where a subscriber
//! may not be installed yet.

/// Initialize logging with the standardized format.
///
/// Honors `RUST_LOG`; defaults to `info` with debug output for this crate.
pub fn init() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,mariposa=debug");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S".to_string(),
        ))
        .with_ansi(false)
        .init();
}

#[macro_export]
macro_rules! mlog {
    ($module:expr, $($arg:tt)*) => {{
        let now = chrono::Local::now();
        eprintln!("{} [{}] {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            $module,
            format!($($arg)*)
        );
    }};
}

/// Standardized module identifiers
pub const MAIN: &str = "MAIN";
pub const WINDOW: &str = "WINDOW";
pub const CURSOR: &str = "CURSOR";
pub const REGION: &str = "REGION";
pub const TRANSPORT: &str = "TRANSPORT";
pub const REGISTRY: &str = "REGISTRY";
