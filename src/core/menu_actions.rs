//! Shared action vocabulary for the auth forms, the browse list and details.
//!
//! Translates raw `KeyEvent`s into semantic `MenuAction`s so every screen can
//! react consistently regardless of which frontend produced the key.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// All possible screen actions
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    // Navigation
    NavigateUp,
    NavigateDown,
    PageUp,
    PageDown,
    Home,
    End,

    // Field Navigation (forms)
    NextField,
    PreviousField,

    // Selection/Confirmation
    Select, // Enter - submit form or open details
    Cancel, // Esc - back, clear search, or quit

    // Text Editing
    Insert(char),
    Backspace,

    // Screen-specific
    ToggleList,     // Tab on the browse screen
    ToggleAuthMode, // Ctrl+R
    GuestSignIn,    // Ctrl+G
    SignOut,        // Ctrl+O
    Quit,           // Ctrl+C

    // No action (key not bound or not applicable in this context)
    None,
}

/// Context for action resolution - determines which actions are valid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionContext {
    AuthForm, // Login/register gate
    Browse,   // Search box + list
    Detail,   // Read-only game details
}

/// Resolve a key to an action for the given context
pub fn resolve_action(key: KeyEvent, context: ActionContext) -> MenuAction {
    let combo = key_event_to_string(key);

    // Global bindings first
    if combo == "Ctrl+c" {
        return MenuAction::Quit;
    }

    match (context, combo.as_str()) {
        (_, "Up") => MenuAction::NavigateUp,
        (_, "Down") => MenuAction::NavigateDown,
        (_, "Esc") => MenuAction::Cancel,

        (ActionContext::AuthForm, "Tab") => MenuAction::NextField,
        (ActionContext::AuthForm, "Shift+Tab") => MenuAction::PreviousField,
        (ActionContext::AuthForm, "Enter") => MenuAction::Select,
        (ActionContext::AuthForm, "Backspace") => MenuAction::Backspace,
        (ActionContext::AuthForm, "Ctrl+g") => MenuAction::GuestSignIn,
        (ActionContext::AuthForm, "Ctrl+r") => MenuAction::ToggleAuthMode,

        (ActionContext::Browse, "Tab") => MenuAction::ToggleList,
        (ActionContext::Browse, "Enter") => MenuAction::Select,
        (ActionContext::Browse, "Backspace") => MenuAction::Backspace,
        (ActionContext::Browse, "PageUp") => MenuAction::PageUp,
        (ActionContext::Browse, "PageDown") => MenuAction::PageDown,
        (ActionContext::Browse, "Home") => MenuAction::Home,
        (ActionContext::Browse, "End") => MenuAction::End,
        (ActionContext::Browse, "Ctrl+o") => MenuAction::SignOut,

        (ActionContext::Detail, "Backspace") => MenuAction::Cancel,
        (ActionContext::Detail, "Ctrl+o") => MenuAction::SignOut,

        _ => text_input(key, context),
    }
}

/// Plain characters type into the focused input on text screens
fn text_input(key: KeyEvent, context: ActionContext) -> MenuAction {
    let typed = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match (context, key.code) {
        (ActionContext::AuthForm | ActionContext::Browse, KeyCode::Char(c)) if typed => {
            MenuAction::Insert(c)
        }
        _ => MenuAction::None,
    }
}

/// Convert KeyEvent to string representation for matching against bindings
pub fn key_event_to_string(key: KeyEvent) -> String {
    let mut parts = Vec::new();

    // Add modifiers
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }

    // Add key code
    let key_str = match key.code {
        KeyCode::Char(c) => {
            // For letter keys with Shift+Ctrl/Alt, use uppercase
            if key.modifiers.contains(KeyModifiers::SHIFT) && c.is_ascii_lowercase() {
                c.to_ascii_uppercase().to_string()
            } else {
                c.to_string()
            }
        }
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => {
            // BackTab always means Shift+Tab, whether or not Shift is reported
            if !parts.contains(&"Shift") {
                parts.push("Shift");
            }
            "Tab".to_string()
        }
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => return String::new(), // Unrecognized key
    };

    parts.push(&key_str);
    parts.join("+")
}
