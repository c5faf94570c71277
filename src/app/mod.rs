// ABOUTME: Main application structure and state management for the welcome wizard

pub mod events;
pub mod state;

pub use events::{AppEvent, EventHandler};
pub use state::{App, AppState};
