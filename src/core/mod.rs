//! Core business logic layer
//!
//! Owns the catalog, the auth session and the UI state machine.
//! NO imports from frontend rendering code; frontends read, core mutates.

pub mod app_core;
pub mod input_router;
pub mod menu_actions;

pub use app_core::AppCore;
