//! Outbound command set for the remote compositor.
//!
//! Every mutation the window core performs on the remote side travels as
//! one of these one-way asynchronous commands. Commands carry plain data
//! only; the transport never replies.

use crate::core::window::cursor::CursorImage;
use crate::core::window::{WidgetState, WidgetType};
use crate::util::geometry::{Point, Rect};

/// Opaque identifier the compositor uses to address a window.
pub type WindowHandle = u32;

// ============================================================================
// Payload Types
// ============================================================================

/// How the input panel (virtual keyboard) should be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImeHiddenType {
    /// Hide the panel but keep the IME session active
    Hide,
    /// Deactivate the IME session entirely
    Deactivate,
}

/// Placement hint for the compositor when positioning a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationHint {
    #[default]
    Unknown,
    North,
    West,
    South,
    East,
    Center,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

/// Kind of text field backing an IME session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextInputType {
    #[default]
    None,
    Text,
    Password,
    Search,
    Email,
    Number,
    Telephone,
    Url,
}

/// IME session parameters forwarded to the compositor's input method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInputInfo {
    pub input_type: TextInputType,
    /// Bitwise OR of host text-input flags, carried opaquely
    pub flags: i32,
    pub max_text_length: Option<u32>,
}

/// Key symbol namespace for injected input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XInputKeySymbolType {
    Native,
    Qt,
}

/// Press/release shape of an injected input action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XInputEventType {
    PressAndRelease,
    Press,
    Release,
}

bitflags::bitflags! {
    /// Remote-control key classes a window may claim or release.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyMask: u32 {
        const HOME = 1 << 0;
        const BACK = 1 << 1;
        const EXIT = 1 << 2;
        const NAVIGATION_LEFT = 1 << 3;
        const NAVIGATION_RIGHT = 1 << 4;
        const NAVIGATION_UP = 1 << 5;
        const NAVIGATION_DOWN = 1 << 6;
        const NAVIGATION_OK = 1 << 7;
        const NUMERIC_KEYS = 1 << 8;
        const REMOTE_COLOR_RED = 1 << 9;
        const REMOTE_COLOR_GREEN = 1 << 10;
        const REMOTE_COLOR_YELLOW = 1 << 11;
        const REMOTE_COLOR_BLUE = 1 << 12;
        const REMOTE_PROGRAMME_GROUP = 1 << 13;
        const REMOTE_TELETEXT_GROUP = 1 << 14;
        const DEFAULT = 0xFFFFFFF8;
    }
}

/// One layer inside a window group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowGroupLayer {
    pub name: String,
    pub z_order: i32,
}

/// Declaration of a named window group and its layers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowGroupConfiguration {
    pub name: String,
    pub is_anonymous: bool,
    pub layers: Vec<WindowGroupLayer>,
}

// ============================================================================
// Commands
// ============================================================================

/// Commands sent to the remote compositor.
///
/// State-bearing commands (`InitWindow`, `Title`, `State`, `AddRegion`,
/// `SubRegion`, `CursorSet`, `MoveWindow`) are gated on the transport being
/// connected and are covered by the deferred replay on reconnect. The rest
/// are pass-throughs: sent immediately, never replayed.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    /// Announce the window object to the compositor
    Create { handle: WindowHandle },
    /// Initialize the window's role, parentage and placement
    InitWindow {
        handle: WindowHandle,
        parent: Option<WindowHandle>,
        bounds: Rect,
        widget_type: WidgetType,
    },
    Title { handle: WindowHandle, title: String },
    State { handle: WindowHandle, state: WidgetState },
    /// Advertise the clip region's bounding box
    AddRegion { handle: WindowHandle, rect: Rect },
    /// Withdraw a previously advertised clip region
    SubRegion { handle: WindowHandle, rect: Rect },
    /// Install a cursor; empty `images` clears it, with the hotspot acting
    /// as the hide/restore sentinel
    CursorSet { images: Vec<CursorImage>, hotspot: Point },
    MoveWindow {
        handle: WindowHandle,
        parent: Option<WindowHandle>,
        widget_type: WidgetType,
        bounds: Rect,
    },
    MoveCursor { location: Point },
    SetWindowProperty {
        handle: WindowHandle,
        name: String,
        value: String,
    },
    DestroyWindow { handle: WindowHandle },

    // Pass-throughs
    ShowInputPanel { handle: WindowHandle },
    HideInputPanel {
        handle: WindowHandle,
        hidden_type: ImeHiddenType,
    },
    TextInputInfo {
        handle: WindowHandle,
        info: TextInputInfo,
    },
    SurroundingText {
        handle: WindowHandle,
        text: String,
        cursor_position: usize,
        anchor_position: usize,
    },
    RequestDragData { mime_type: String },
    RequestSelectionData { mime_type: String },
    DragWillBeAccepted { serial: u32, mime_type: String },
    DragWillBeRejected { serial: u32 },
    SetLocationHint {
        handle: WindowHandle,
        hint: LocationHint,
    },
    CreateWindowGroup {
        handle: WindowHandle,
        config: WindowGroupConfiguration,
    },
    AttachToWindowGroup {
        handle: WindowHandle,
        group: String,
        layer: String,
    },
    FocusWindowGroupOwner { handle: WindowHandle },
    FocusWindowGroupLayer { handle: WindowHandle },
    DetachWindowGroup { handle: WindowHandle },
    XInputActivate { kind: String },
    XInputDeactivate,
    XInputInvokeAction {
        keysym: u32,
        symbol_type: XInputKeySymbolType,
        event_type: XInputEventType,
    },
    SetInputRegion {
        handle: WindowHandle,
        region: Vec<Rect>,
    },
    SetGroupKeyMask {
        handle: WindowHandle,
        mask: KeyMask,
    },
    SetKeyMask {
        handle: WindowHandle,
        mask: KeyMask,
        set: bool,
    },
}

impl DisplayCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            DisplayCommand::Create { .. } => "Create",
            DisplayCommand::InitWindow { .. } => "InitWindow",
            DisplayCommand::Title { .. } => "Title",
            DisplayCommand::State { .. } => "State",
            DisplayCommand::AddRegion { .. } => "AddRegion",
            DisplayCommand::SubRegion { .. } => "SubRegion",
            DisplayCommand::CursorSet { .. } => "CursorSet",
            DisplayCommand::MoveWindow { .. } => "MoveWindow",
            DisplayCommand::MoveCursor { .. } => "MoveCursor",
            DisplayCommand::SetWindowProperty { .. } => "SetWindowProperty",
            DisplayCommand::DestroyWindow { .. } => "DestroyWindow",
            DisplayCommand::ShowInputPanel { .. } => "ShowInputPanel",
            DisplayCommand::HideInputPanel { .. } => "HideInputPanel",
            DisplayCommand::TextInputInfo { .. } => "TextInputInfo",
            DisplayCommand::SurroundingText { .. } => "SurroundingText",
            DisplayCommand::RequestDragData { .. } => "RequestDragData",
            DisplayCommand::RequestSelectionData { .. } => "RequestSelectionData",
            DisplayCommand::DragWillBeAccepted { .. } => "DragWillBeAccepted",
            DisplayCommand::DragWillBeRejected { .. } => "DragWillBeRejected",
            DisplayCommand::SetLocationHint { .. } => "SetLocationHint",
            DisplayCommand::CreateWindowGroup { .. } => "CreateWindowGroup",
            DisplayCommand::AttachToWindowGroup { .. } => "AttachToWindowGroup",
            DisplayCommand::FocusWindowGroupOwner { .. } => "FocusWindowGroupOwner",
            DisplayCommand::FocusWindowGroupLayer { .. } => "FocusWindowGroupLayer",
            DisplayCommand::DetachWindowGroup { .. } => "DetachWindowGroup",
            DisplayCommand::XInputActivate { .. } => "XInputActivate",
            DisplayCommand::XInputDeactivate => "XInputDeactivate",
            DisplayCommand::XInputInvokeAction { .. } => "XInputInvokeAction",
            DisplayCommand::SetInputRegion { .. } => "SetInputRegion",
            DisplayCommand::SetGroupKeyMask { .. } => "SetGroupKeyMask",
            DisplayCommand::SetKeyMask { .. } => "SetKeyMask",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mask_default_excludes_system_keys() {
        let mask = KeyMask::DEFAULT;
        assert!(!mask.contains(KeyMask::HOME));
        assert!(!mask.contains(KeyMask::BACK));
        assert!(!mask.contains(KeyMask::EXIT));
        assert!(mask.contains(KeyMask::NAVIGATION_OK));
    }

    #[test]
    fn test_command_name() {
        let cmd = DisplayCommand::Create { handle: 7 };
        assert_eq!(cmd.name(), "Create");
        assert_eq!(DisplayCommand::XInputDeactivate.name(), "XInputDeactivate");
    }
}
