//! Simulated account gate in front of the browse screen.
//!
//! Accounts live in an in-memory `CredentialStore` for the lifetime of the
//! process. Nothing is persisted and no password is ever stored or checked
//! for real. `AuthSession` owns the store and the single `SessionState`.

use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "user@example.com";
pub const DEMO_USERNAME: &str = "DemoUser";
pub const GUEST_EMAIL: &str = "guest@example.com";
pub const GUEST_USERNAME: &str = "Guest";

/// Password accepted for any existing account
pub const SENTINEL_PASSWORD: &str = "password";
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

impl UserProfile {
    pub fn new(email: &str, username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.email == GUEST_EMAIL
    }
}

/// Registered accounts keyed by exact (case-sensitive) email
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    accounts: HashMap<String, UserProfile>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo account
    pub fn with_demo_account() -> Self {
        let mut store = Self::new();
        store.insert(UserProfile::new(DEMO_EMAIL, DEMO_USERNAME));
        store
    }

    pub fn contains(&self, email: &str) -> bool {
        self.accounts.contains_key(email)
    }

    pub fn get(&self, email: &str) -> Option<&UserProfile> {
        self.accounts.get(email)
    }

    /// Insert a profile. Returns false (and leaves the store untouched) if the
    /// email is already registered.
    pub fn insert(&mut self, profile: UserProfile) -> bool {
        if self.accounts.contains_key(&profile.email) {
            return false;
        }
        self.accounts.insert(profile.email.clone(), profile);
        true
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing or malformed input
    Validation(String),
    /// Email already registered
    Conflict(String),
    /// Unknown account or rejected password
    InvalidCredentials(String),
}

impl AuthError {
    pub fn message(&self) -> &str {
        match self {
            AuthError::Validation(msg)
            | AuthError::Conflict(msg)
            | AuthError::InvalidCredentials(msg) => msg,
        }
    }

    fn validation(msg: &str) -> Self {
        AuthError::Validation(msg.to_string())
    }

    fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials("invalid email or password".to_string())
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AuthError {}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(UserProfile),
}

impl SessionState {
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated(profile) => Some(profile),
            SessionState::Unauthenticated => None,
        }
    }

    #[cfg(test)]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

type SessionObserver = Box<dyn FnMut(&SessionState)>;

/// The process-wide session: credential store, current state, last error
pub struct AuthSession {
    store: CredentialStore,
    state: SessionState,
    last_error: Option<AuthError>,
    observers: Vec<SessionObserver>,
}

impl AuthSession {
    pub fn new(store: CredentialStore) -> Self {
        tracing::debug!("Credential store ready with {} account(s)", store.len());
        Self {
            store,
            state: SessionState::Unauthenticated,
            last_error: None,
            observers: Vec::new(),
        }
    }

    pub fn with_demo_store() -> Self {
        Self::new(CredentialStore::with_demo_account())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&AuthError> {
        self.last_error.as_ref()
    }

    /// Drop the last error without touching the session state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    #[cfg(test)]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Register a callback that runs after every session transition
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&SessionState) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<UserProfile, AuthError> {
        self.last_error = None;

        let result = self.try_register(email, password, username);
        self.finish("register", email, result)
    }

    fn try_register(
        &mut self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<UserProfile, AuthError> {
        if email.is_empty() || password.is_empty() || username.is_empty() {
            return Err(AuthError::validation("all fields required"));
        }
        if self.store.contains(email) {
            return Err(AuthError::Conflict("account already exists".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation("password too short"));
        }

        let profile = UserProfile::new(email, username);
        self.store.insert(profile.clone());
        Ok(profile)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        self.last_error = None;

        let result = self.try_login(email, password);
        self.finish("login", email, result)
    }

    fn try_login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::validation("email and password required"));
        }

        let profile = self
            .store
            .get(email)
            .ok_or_else(AuthError::invalid_credentials)?;

        // NOTE: the email comparison always holds for a found account, so any
        // password is accepted. Kept as-is; this is a simulation, not real auth.
        if password == SENTINEL_PASSWORD || profile.email == email {
            Ok(profile.clone())
        } else {
            Err(AuthError::invalid_credentials())
        }
    }

    pub fn sign_in_as_guest(&mut self) -> UserProfile {
        self.last_error = None;

        let profile = UserProfile::new(GUEST_EMAIL, GUEST_USERNAME);
        tracing::info!("Guest session started ({})", profile.id);
        self.transition(SessionState::Authenticated(profile.clone()));
        profile
    }

    pub fn sign_out(&mut self) {
        self.last_error = None;

        if let Some(profile) = self.state.profile() {
            tracing::info!("Signing out {}", profile.username);
        }
        self.transition(SessionState::Unauthenticated);
    }

    fn finish(
        &mut self,
        operation: &str,
        email: &str,
        result: Result<UserProfile, AuthError>,
    ) -> Result<UserProfile, AuthError> {
        match &result {
            Ok(profile) => {
                tracing::info!("{} succeeded for {} ({})", operation, email, profile.username);
                self.transition(SessionState::Authenticated(profile.clone()));
            }
            Err(e) => {
                tracing::warn!("{} failed for {:?}: {}", operation, email, e);
                self.last_error = Some(e.clone());
            }
        }
        result
    }

    fn transition(&mut self, state: SessionState) {
        self.state = state;
        for observer in &mut self.observers {
            observer(&self.state);
        }
    }
}
