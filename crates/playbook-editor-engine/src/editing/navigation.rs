use crate::editing::block::{Block, BlockKind};
use crate::geometry::{
    CaretPosition, TextLayout, caret_on_first_line, caret_on_last_line, position_from_selection,
};

/// Keys the navigation state machine cares about. Everything else passes
/// through to the host untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// A key press as delivered by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn with_shift(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// What the host should do with the native event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDispatch {
    /// The engine consumed the event; the host must prevent the default
    /// editing behavior.
    Handled,
    /// Let the host's native editing handle it.
    PassThrough,
}

impl KeyDispatch {
    pub fn prevents_default(&self) -> bool {
        matches!(self, KeyDispatch::Handled)
    }
}

/// Model action a key press resolved to. Applied by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    InsertSiblingBelow,
    RetypeToText,
    RemoveBlock,
    FocusPrevious { position: CaretPosition },
    FocusNext { position: CaretPosition },
    SaveCaret { position: CaretPosition },
    None,
}

/// Resolve a key press against the focused block and its live geometry.
///
/// Pure decision table — no mutation happens here:
///
/// - Enter (no shift) always inserts an empty sibling below; the content is
///   not split at the caret.
/// - Backspace at column 0 of a typed block undoes the retype; on an empty
///   block it removes the block; otherwise native deletion runs.
/// - ArrowUp/Down only leave the block when the caret sits on its first/last
///   visual line (an empty block is trivially both); otherwise the native
///   move runs and the caret is re-saved for a later vertical hop.
pub(crate) fn resolve_key(
    event: &KeyEvent,
    block: &Block,
    layout: &dyn TextLayout,
) -> (KeyAction, KeyDispatch) {
    match event.key {
        Key::Enter if !event.shift => (KeyAction::InsertSiblingBelow, KeyDispatch::Handled),
        Key::Enter => (KeyAction::None, KeyDispatch::PassThrough),
        Key::Backspace => {
            let position = position_from_selection(layout);
            if block.kind != BlockKind::Text && position.column == 0 {
                (KeyAction::RetypeToText, KeyDispatch::Handled)
            } else if block.is_empty() {
                (KeyAction::RemoveBlock, KeyDispatch::Handled)
            } else {
                (KeyAction::None, KeyDispatch::PassThrough)
            }
        }
        Key::ArrowUp => {
            let position = position_from_selection(layout);
            if block.is_empty() || caret_on_first_line(layout) {
                (KeyAction::FocusPrevious { position }, KeyDispatch::Handled)
            } else {
                (KeyAction::SaveCaret { position }, KeyDispatch::PassThrough)
            }
        }
        Key::ArrowDown => {
            let position = position_from_selection(layout);
            if block.is_empty() || caret_on_last_line(layout) {
                (KeyAction::FocusNext { position }, KeyDispatch::Handled)
            } else {
                (KeyAction::SaveCaret { position }, KeyDispatch::PassThrough)
            }
        }
        // Native intra-block movement; the host re-saves the caret on key-up.
        Key::ArrowLeft | Key::ArrowRight => (KeyAction::None, KeyDispatch::PassThrough),
        Key::Other => (KeyAction::None, KeyDispatch::PassThrough),
    }
}
