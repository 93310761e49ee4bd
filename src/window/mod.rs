//! Panel window
//!
//! eframe window rendering the debug form and forwarding user gestures.

pub mod app;
pub mod theme;

pub use app::{run_panel, DebugPanelApp};
