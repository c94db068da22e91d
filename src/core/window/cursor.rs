//! Cursor types and the background bitmap decode path.
//!
//! Custom cursors arrive as a file path; reading and decoding the file
//! must stay off the control thread. A worker thread decodes and pushes
//! the result onto a shared completion queue which the host drains on the
//! control thread (`ShellWindow::pump_cursor_tasks`). Each request carries
//! a generation tag so completions for superseded or dead requests are
//! dropped instead of touching stale state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::errors::{CoreError, Result};
use crate::util::geometry::Point;

/// The compositor reserves hotspot (254,254) on an empty cursor to mean
/// "hide the cursor".
pub const CURSOR_HIDE_HOTSPOT: Point = Point { x: 254, y: 254 };
/// Hotspot (255,255) on an empty cursor restores the default cursor.
pub const CURSOR_RESTORE_HOTSPOT: Point = Point { x: 255, y: 255 };

/// Kind of custom cursor requested by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomCursorType {
    /// No custom cursor; the default cursor is in effect
    #[default]
    NotUse,
    /// Bitmap cursor decoded from a file path
    Path,
    /// Invisible cursor
    Blank,
}

/// One decoded cursor frame, RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A decoded cursor ready to send: frames plus hotspot.
/// Multiple frames represent an animated cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorBitmap {
    pub frames: Vec<CursorImage>,
    pub hotspot: Point,
}

impl CursorBitmap {
    pub fn single(image: CursorImage, hotspot: Point) -> Self {
        Self {
            frames: vec![image],
            hotspot,
        }
    }
}

/// A cursor owned by the host toolkit, addressed by identity.
///
/// The registry tracks which platform cursor is installed; windows compare
/// by `id` to skip redundant installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCursor {
    pub id: u32,
    pub bitmap: CursorBitmap,
}

// ============================================================================
// Decode requests and completions
// ============================================================================

/// Parameters of an in-flight custom-cursor decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorDecodeRequest {
    /// Generation tag; a completion is applied only if it still matches
    /// the window's current generation
    pub generation: u32,
    pub cursor_type: CustomCursorType,
    pub hotspot: Point,
    pub allow_overriding: bool,
}

/// Completion posted back to the control thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorDecodeResult {
    pub request: CursorDecodeRequest,
    /// `None` means the caller supplied no image; the window falls back to
    /// restoring the default cursor
    pub image: Option<CursorImage>,
}

/// Completion queue shared between decode workers and the control thread.
#[derive(Default, Clone)]
pub struct CursorTaskQueue {
    tasks: Arc<Mutex<VecDeque<CursorDecodeResult>>>,
}

impl CursorTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: CursorDecodeResult) {
        self.tasks.lock().unwrap().push_back(result);
    }

    /// Take all pending completions.
    pub fn take_all(&self) -> Vec<CursorDecodeResult> {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.drain(..).collect()
    }

    pub fn has_tasks(&self) -> bool {
        !self.tasks.lock().unwrap().is_empty()
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Read and decode a cursor image file into RGBA8.
pub fn decode_cursor_file(path: &str) -> Result<CursorImage> {
    if path.is_empty() {
        return Err(CoreError::CursorRead("empty path".to_string()));
    }
    let bytes =
        std::fs::read(path).map_err(|e| CoreError::CursorRead(format!("{}: {}", path, e)))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| CoreError::CursorDecode(format!("{}: {}", path, e)))?;
    let rgba = decoded.to_rgba8();
    Ok(CursorImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Decode `path` on a worker thread and post the completion to `queue`.
///
/// Read or decode failure abandons the request: nothing is posted, the
/// window keeps its previous cursor state.
pub fn spawn_decode(path: String, request: CursorDecodeRequest, queue: CursorTaskQueue) {
    std::thread::spawn(move || match decode_cursor_file(&path) {
        Ok(image) => {
            queue.push(CursorDecodeResult {
                request,
                image: Some(image),
            });
        }
        Err(e) => {
            tracing::info!("cursor decode abandoned: {}", e);
        }
    });
}
