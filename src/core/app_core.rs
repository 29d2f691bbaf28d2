//! Frontend-agnostic application core: owns the session, catalog and UI
//! state, and turns input events into state changes.

use crate::auth::{AuthError, AuthSession, UserProfile};
use crate::catalog::{GameCatalog, GameRecord};
use crate::config::Config;
use crate::core::input_router::route_input;
use crate::core::menu_actions::MenuAction;
use crate::data::ui_state::{AuthForm, AuthFormKind, Screen, UiState};
use crate::frontend::FrontendEvent;
use crate::location::{LocationStatus, LocationUpdate};

/// Rows skipped by PageUp/PageDown
const PAGE_SIZE: isize = 10;

/// Core application state (frontend-agnostic)
///
/// AppCore owns the catalog, the auth session and all UI state. Frontends feed
/// it `FrontendEvent`s and read it back to render; they never mutate it
/// directly.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// Games and tournaments loaded at startup
    pub catalog: GameCatalog,

    /// Credential store + session state
    pub auth: AuthSession,

    /// Screens, forms, search box and selection
    pub ui_state: UiState,

    /// Last report from the location provider
    pub location: LocationStatus,

    /// Application running flag
    pub running: bool,

    /// Set whenever something visible changed
    pub needs_render: bool,
}

impl AppCore {
    pub fn new(config: Config, catalog: GameCatalog) -> Self {
        let mut auth = AuthSession::with_demo_store();
        auth.subscribe(|state| match state.profile() {
            Some(profile) => tracing::debug!("Session authenticated as {}", profile.username),
            None => tracing::debug!("Session unauthenticated"),
        });

        let ui_state = UiState::new(config.ui.start_list);

        Self {
            config,
            catalog,
            auth,
            ui_state,
            location: LocationStatus::default(),
            running: true,
            needs_render: true,
        }
    }

    /// The list the browse screen shows right now
    pub fn visible_games(&self) -> Vec<GameRecord> {
        let browse = &self.ui_state.browse;
        self.catalog.query(browse.list, &browse.search_text)
    }

    pub fn selected_game(&self) -> Option<GameRecord> {
        self.visible_games()
            .into_iter()
            .nth(self.ui_state.browse.selected)
    }

    /// The game shown on the detail screen
    pub fn detail_game(&self) -> Option<&GameRecord> {
        match self.ui_state.screen {
            Screen::Detail(id) => self.catalog.find(id),
            _ => None,
        }
    }

    /// Distance from the user to a game, once a location fix is known
    pub fn distance_km(&self, game: &GameRecord) -> Option<f64> {
        self.location
            .coordinate()
            .map(|here| here.distance_km(&game.coordinate))
    }

    pub fn auth_error(&self) -> Option<&AuthError> {
        self.auth.last_error()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.auth.state().profile()
    }

    pub fn apply_location(&mut self, update: LocationUpdate) {
        tracing::debug!("Location update: {:?}", update);
        self.location.apply(update);
        self.needs_render = true;
    }

    pub fn handle_event(&mut self, event: FrontendEvent) {
        match event {
            FrontendEvent::Key { .. } => {
                if let Some(key) = event.as_key_event() {
                    let action = route_input(key, &self.ui_state.screen);
                    self.apply_action(action);
                }
            }
            FrontendEvent::Resize { .. } => self.needs_render = true,
            FrontendEvent::Paste { text } => self.paste(&text),
        }
    }

    pub fn apply_action(&mut self, action: MenuAction) {
        if action == MenuAction::None {
            return;
        }
        self.needs_render = true;

        match self.ui_state.screen {
            Screen::Login | Screen::Register => self.handle_form_action(action),
            Screen::Browse => self.handle_browse_action(action),
            Screen::Detail(_) => self.handle_detail_action(action),
        }
    }

    fn handle_form_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::NextField | MenuAction::NavigateDown => self.ui_state.form.next_field(),
            MenuAction::PreviousField | MenuAction::NavigateUp => {
                self.ui_state.form.previous_field()
            }
            MenuAction::Insert(c) => self.ui_state.form.insert_char(c),
            MenuAction::Backspace => self.ui_state.form.backspace(),
            MenuAction::Select => self.submit_auth_form(),
            MenuAction::GuestSignIn => {
                self.sign_in_as_guest();
            }
            MenuAction::ToggleAuthMode => self.toggle_auth_mode(),
            MenuAction::Cancel | MenuAction::Quit => self.quit(),
            _ => {}
        }
    }

    fn handle_browse_action(&mut self, action: MenuAction) {
        let len = self.visible_games().len();
        let browse = &mut self.ui_state.browse;

        match action {
            MenuAction::NavigateUp => browse.move_selection(-1, len),
            MenuAction::NavigateDown => browse.move_selection(1, len),
            MenuAction::PageUp => browse.move_selection(-PAGE_SIZE, len),
            MenuAction::PageDown => browse.move_selection(PAGE_SIZE, len),
            MenuAction::Home => browse.selected = 0,
            MenuAction::End => browse.selected = len.saturating_sub(1),
            MenuAction::Insert(c) => {
                browse.search_text.push(c);
                self.search_changed();
            }
            MenuAction::Backspace => {
                if browse.search_text.pop().is_some() {
                    self.search_changed();
                }
            }
            MenuAction::ToggleList => {
                browse.list = browse.list.toggle();
                browse.selected = 0;
                tracing::debug!("Switched to {} list", browse.list.label());
            }
            MenuAction::Select => self.open_selected(),
            MenuAction::Cancel => {
                if browse.search_text.is_empty() {
                    self.quit();
                } else {
                    browse.search_text.clear();
                    self.search_changed();
                }
            }
            MenuAction::SignOut => self.sign_out(),
            MenuAction::Quit => self.quit(),
            _ => {}
        }
    }

    fn handle_detail_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::Cancel => self.ui_state.screen = Screen::Browse,
            MenuAction::SignOut => self.sign_out(),
            MenuAction::Quit => self.quit(),
            _ => {}
        }
    }

    fn paste(&mut self, text: &str) {
        match self.ui_state.screen {
            Screen::Login | Screen::Register => self.ui_state.form.insert_str(text),
            Screen::Browse => {
                self.ui_state
                    .browse
                    .search_text
                    .extend(text.chars().filter(|c| !c.is_control()));
                self.search_changed();
            }
            Screen::Detail(_) => return,
        }
        self.needs_render = true;
    }

    fn search_changed(&mut self) {
        let len = self.visible_games().len();
        self.ui_state.browse.clamp_selection(len);
    }

    fn open_selected(&mut self) {
        if let Some(game) = self.selected_game() {
            tracing::debug!("Opening details for {}", game.matchup());
            self.ui_state.screen = Screen::Detail(game.id);
        }
    }

    /// Submit the login or register form, depending on which one is showing
    pub fn submit_auth_form(&mut self) {
        let form = &self.ui_state.form;
        let result = match form.kind {
            AuthFormKind::Login => self.auth.login(form.value("Email"), form.value("Password")),
            AuthFormKind::Register => self.auth.register(
                form.value("Email"),
                form.value("Password"),
                form.value("Username"),
            ),
        };
        self.ui_state.form.clear_secrets();

        match result {
            Ok(profile) => self.enter_browse(&profile),
            // The error stays on the session for the gate to render
            Err(_) => self.ui_state.status_text.clear(),
        }
    }

    pub fn sign_in_as_guest(&mut self) -> UserProfile {
        let profile = self.auth.sign_in_as_guest();
        self.enter_browse(&profile);
        profile
    }

    pub fn sign_out(&mut self) {
        self.auth.sign_out();
        self.ui_state.screen = Screen::Login;
        self.ui_state.form = AuthForm::login();
        self.ui_state.status_text = "Signed out".to_string();
        self.needs_render = true;
    }

    fn toggle_auth_mode(&mut self) {
        // An error from the other form no longer applies
        self.auth.clear_error();
        self.ui_state.form = self.ui_state.form.toggled();
        self.ui_state.screen = match self.ui_state.form.kind {
            AuthFormKind::Login => Screen::Login,
            AuthFormKind::Register => Screen::Register,
        };
    }

    fn enter_browse(&mut self, profile: &UserProfile) {
        self.ui_state.screen = Screen::Browse;
        self.ui_state.form = AuthForm::login();
        self.ui_state.browse.selected = 0;
        self.ui_state.status_text = format!("Signed in as {}", profile.username);
        self.needs_render = true;
    }

    /// Record the list being browsed as the next start list.
    /// Returns true if the config changed and should be saved.
    pub fn remember_start_list(&mut self) -> bool {
        let list = self.ui_state.browse.list;
        if self.config.ui.start_list == list {
            return false;
        }
        self.config.ui.start_list = list;
        true
    }

    pub fn quit(&mut self) {
        tracing::info!("Quit requested");
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{DEMO_EMAIL, DEMO_USERNAME, GUEST_USERNAME};
    use crate::catalog::ListKind;
    use crate::location::Coordinate;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn core() -> AppCore {
        AppCore::new(
            Config::default(),
            GameCatalog::builtin().expect("built-in catalog"),
        )
    }

    fn type_text(core: &mut AppCore, text: &str) {
        for c in text.chars() {
            core.apply_action(MenuAction::Insert(c));
        }
    }

    fn login(core: &mut AppCore, email: &str, password: &str) {
        type_text(core, email);
        core.apply_action(MenuAction::NextField);
        type_text(core, password);
        core.apply_action(MenuAction::Select);
    }

    #[test]
    fn test_starts_on_login_gate() {
        let core = core();
        assert_eq!(core.ui_state.screen, Screen::Login);
        assert!(core.current_user().is_none());
        assert!(core.running);
    }

    #[test]
    fn test_login_success_enters_browse() {
        let mut core = core();
        login(&mut core, DEMO_EMAIL, "password");
        assert_eq!(core.ui_state.screen, Screen::Browse);
        assert_eq!(
            core.current_user().map(|p| p.username.as_str()),
            Some(DEMO_USERNAME)
        );
        assert!(core.ui_state.status_text.contains(DEMO_USERNAME));
    }

    #[test]
    fn test_login_failure_stays_on_gate() {
        let mut core = core();
        login(&mut core, "unknown@x.com", "password");
        assert_eq!(core.ui_state.screen, Screen::Login);
        assert!(matches!(
            core.auth_error(),
            Some(AuthError::InvalidCredentials(_))
        ));
        assert_eq!(core.ui_state.form.value("Password"), "");
        assert_eq!(core.ui_state.form.value("Email"), "unknown@x.com");
    }

    #[test]
    fn test_register_flow() {
        let mut core = core();
        core.apply_action(MenuAction::ToggleAuthMode);
        assert_eq!(core.ui_state.screen, Screen::Register);

        type_text(&mut core, "a@b.com");
        core.apply_action(MenuAction::NextField);
        type_text(&mut core, "Al");
        core.apply_action(MenuAction::NextField);
        type_text(&mut core, "12345");
        core.apply_action(MenuAction::Select);
        assert_eq!(core.ui_state.screen, Screen::Register);
        assert_eq!(
            core.auth_error().map(|e| e.message()),
            Some("password too short")
        );

        type_text(&mut core, "123456");
        core.apply_action(MenuAction::Select);
        assert_eq!(core.ui_state.screen, Screen::Browse);
        assert!(core.auth_error().is_none());
        assert!(core.auth.store().contains("a@b.com"));
    }

    #[test]
    fn test_switching_forms_clears_error() {
        let mut core = core();
        core.apply_action(MenuAction::Select);
        assert_eq!(
            core.auth_error().map(|e| e.message()),
            Some("email and password required")
        );

        core.apply_action(MenuAction::ToggleAuthMode);
        assert_eq!(core.ui_state.screen, Screen::Register);
        assert!(core.auth_error().is_none());
        assert!(core.current_user().is_none());
    }

    #[test]
    fn test_guest_and_sign_out() {
        let mut core = core();
        core.apply_action(MenuAction::GuestSignIn);
        assert_eq!(core.ui_state.screen, Screen::Browse);
        assert_eq!(
            core.current_user().map(|p| p.username.as_str()),
            Some(GUEST_USERNAME)
        );

        core.apply_action(MenuAction::SignOut);
        assert_eq!(core.ui_state.screen, Screen::Login);
        assert!(core.current_user().is_none());
        assert!(core.auth_error().is_none());
    }

    #[test]
    fn test_typing_filters_list() {
        let mut core = core();
        core.sign_in_as_guest();
        let all = core.visible_games().len();

        type_text(&mut core, "WELSH");
        let filtered = core.visible_games();
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].venue.contains("Welsh"));
        assert!(filtered.len() < all);

        core.apply_action(MenuAction::Cancel);
        assert_eq!(core.ui_state.browse.search_text, "");
        assert_eq!(core.visible_games().len(), all);
        assert!(core.running);
    }

    #[test]
    fn test_selection_clamps_when_list_shrinks() {
        let mut core = core();
        core.sign_in_as_guest();
        core.apply_action(MenuAction::End);
        let last = core.visible_games().len() - 1;
        assert_eq!(core.ui_state.browse.selected, last);

        type_text(&mut core, "hawks");
        let len = core.visible_games().len();
        assert_eq!(len, 2);
        assert_eq!(core.ui_state.browse.selected, len - 1);
    }

    #[test]
    fn test_toggle_list_uses_same_search() {
        let mut core = core();
        core.sign_in_as_guest();
        type_text(&mut core, "midway");
        assert_eq!(core.ui_state.browse.list, ListKind::Games);
        let games = core.visible_games();

        core.apply_action(MenuAction::ToggleList);
        assert_eq!(core.ui_state.browse.list, ListKind::Tournaments);
        let tournaments = core.visible_games();
        assert_eq!(games.len(), 1);
        assert_eq!(tournaments.len(), 1);
        assert_ne!(games[0], tournaments[0]);
    }

    #[test]
    fn test_remember_start_list() {
        let mut core = core();
        core.sign_in_as_guest();
        assert!(!core.remember_start_list());

        core.apply_action(MenuAction::ToggleList);
        assert!(core.remember_start_list());
        assert_eq!(core.config.ui.start_list, ListKind::Tournaments);
        assert!(!core.remember_start_list());
    }

    #[test]
    fn test_detail_round_trip() {
        let mut core = core();
        core.sign_in_as_guest();
        let first = core.visible_games()[0].clone();

        core.apply_action(MenuAction::Select);
        assert_eq!(core.ui_state.screen, Screen::Detail(first.id));
        assert_eq!(core.detail_game(), Some(&first));

        core.apply_action(MenuAction::Cancel);
        assert_eq!(core.ui_state.screen, Screen::Browse);
        assert!(core.detail_game().is_none());
    }

    #[test]
    fn test_select_on_empty_list_does_nothing() {
        let mut core = core();
        core.sign_in_as_guest();
        type_text(&mut core, "no such team");
        core.apply_action(MenuAction::Select);
        assert_eq!(core.ui_state.screen, Screen::Browse);
    }

    #[test]
    fn test_escape_with_empty_search_quits() {
        let mut core = core();
        core.sign_in_as_guest();
        core.apply_action(MenuAction::Cancel);
        assert!(!core.running);
    }

    #[test]
    fn test_key_events_route_through_screen() {
        let mut core = core();
        core.handle_event(FrontendEvent::key(
            KeyCode::Char('g'),
            KeyModifiers::CONTROL,
        ));
        assert_eq!(core.ui_state.screen, Screen::Browse);

        core.handle_event(FrontendEvent::paste("lakeview".to_string()));
        assert_eq!(core.ui_state.browse.search_text, "lakeview");

        core.handle_event(FrontendEvent::key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!core.running);
    }

    #[test]
    fn test_distance_needs_location() {
        let mut core = core();
        let game = core.visible_games()[0].clone();
        assert!(core.distance_km(&game).is_none());

        core.apply_location(LocationUpdate::Position(game.coordinate));
        assert!(core.distance_km(&game).unwrap() < 1e-6);

        core.apply_location(LocationUpdate::Position(Coordinate::new(0.0, 0.0)));
        assert!(core.distance_km(&game).unwrap() > 1000.0);
    }
}
