//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait that frontends implement.
//! It provides a unified interface for event polling, rendering, and cleanup.

pub mod events;
pub mod tui;

use crate::core::AppCore;
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Frontend trait - separates rendering concerns from the core
pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events converted to the frontend-agnostic
    /// `FrontendEvent` enum (empty if there were none).
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Render the current application state
    fn render(&mut self, core: &AppCore) -> Result<()>;

    /// Restore the terminal and release resources
    fn cleanup(&mut self) -> Result<()>;
}
