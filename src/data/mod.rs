//! Data layer - Pure state without UI coupling
//!
//! NO imports from frontend/ or any rendering code.
//! Frontends read from these structures to render.

pub mod ui_state;
