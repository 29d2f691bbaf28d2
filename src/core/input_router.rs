//! Input routing
//!
//! Routes keyboard input to the appropriate MenuAction based on which screen
//! currently has focus.

use crate::core::menu_actions::{resolve_action, ActionContext, MenuAction};
use crate::data::ui_state::Screen;
use crossterm::event::KeyEvent;

/// Route a key event to a MenuAction based on current screen
pub fn route_input(key: KeyEvent, screen: &Screen) -> MenuAction {
    resolve_action(key, get_action_context(screen))
}

/// Map Screen to ActionContext for key resolution
fn get_action_context(screen: &Screen) -> ActionContext {
    match screen {
        Screen::Login | Screen::Register => ActionContext::AuthForm,
        Screen::Browse => ActionContext::Browse,
        Screen::Detail(_) => ActionContext::Detail,
    }
}
