//! UI State - screens, form input and list selection
//!
//! This module contains UI state that is independent of rendering.
//! Frontends read from these structures; only the core mutates them.

use crate::catalog::ListKind;
use uuid::Uuid;

/// Which screen is showing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Browse,
    /// Details for one game, by id
    Detail(Uuid),
}

impl Screen {
    pub fn is_auth_gate(&self) -> bool {
        matches!(self, Screen::Login | Screen::Register)
    }
}

/// One text input on the login/register form
#[derive(Clone, Debug)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Render as bullets (passwords)
    pub masked: bool,
}

impl FormField {
    fn new(label: &'static str, masked: bool) -> Self {
        Self {
            label,
            value: String::new(),
            masked,
        }
    }

    pub fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthFormKind {
    Login,
    Register,
}

/// Login or register form state
#[derive(Clone, Debug)]
pub struct AuthForm {
    pub kind: AuthFormKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl AuthForm {
    pub fn login() -> Self {
        Self {
            kind: AuthFormKind::Login,
            fields: vec![FormField::new("Email", false), FormField::new("Password", true)],
            focused: 0,
        }
    }

    pub fn register() -> Self {
        Self {
            kind: AuthFormKind::Register,
            fields: vec![
                FormField::new("Email", false),
                FormField::new("Username", false),
                FormField::new("Password", true),
            ],
            focused: 0,
        }
    }

    /// Switch between login and register, carrying the email over
    pub fn toggled(&self) -> Self {
        let mut next = match self.kind {
            AuthFormKind::Login => Self::register(),
            AuthFormKind::Register => Self::login(),
        };
        next.fields[0].value = self.value("Email").to_string();
        next
    }

    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
        }
    }

    pub fn insert_str(&mut self, text: &str) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// Wipe password fields (after a submit)
    pub fn clear_secrets(&mut self) {
        for field in self.fields.iter_mut().filter(|f| f.masked) {
            field.value.clear();
        }
    }
}

/// Games/tournaments list state
#[derive(Clone, Debug, Default)]
pub struct BrowseState {
    pub list: ListKind,
    pub search_text: String,
    pub selected: usize,
}

impl BrowseState {
    pub fn new(list: ListKind) -> Self {
        Self {
            list,
            ..Self::default()
        }
    }

    /// Keep the selection inside a list of `len` rows
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }
}

/// Application UI state
#[derive(Clone, Debug)]
pub struct UiState {
    pub screen: Screen,
    pub form: AuthForm,
    pub browse: BrowseState,
    /// Status bar text
    pub status_text: String,
}

impl UiState {
    pub fn new(start_list: ListKind) -> Self {
        Self {
            screen: Screen::Login,
            form: AuthForm::login(),
            browse: BrowseState::new(start_list),
            status_text: String::new(),
        }
    }
}
