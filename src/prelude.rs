//! Common imports and types used throughout Mariposa.

pub use std::collections::HashMap;
pub use std::sync::{Arc, RwLock};

pub use crate::util::geometry::{Point, Rect, Size};

// Add common internal types here
pub type Result<T> = std::result::Result<T, crate::core::errors::CoreError>;
