//! Platform Integration Module
//!
//! Mariposa is the Rust core of a host toolkit's windowing backend. The
//! host implements the delegate interface here; everything else it drives
//! through `core`.

pub mod api;

pub use api::{StubDelegate, WindowDelegate};
