//! Frontend-agnostic input events.
//!
//! Frontends translate their native event streams (crossterm, etc.) into this
//! enum so the core only handles one event shape.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Terminal/window resize
    Resize { width: u16, height: u16 },
    /// Paste event (text from clipboard)
    Paste { text: String },
}

impl FrontendEvent {
    /// Create a key event
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    /// Create a resize event
    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    /// Create a paste event
    pub fn paste(text: String) -> Self {
        Self::Paste { text }
    }

    /// The crossterm key event, if this is a key press
    pub fn as_key_event(&self) -> Option<KeyEvent> {
        match self {
            Self::Key { code, modifiers } => Some(KeyEvent::new(*code, *modifiers)),
            _ => None,
        }
    }
}
