//! Debug panel logic, independent of rendering

pub mod controller;
pub mod input;
pub mod state;

pub use controller::PanelController;
pub use input::{Gesture, GestureEvent};
pub use state::PanelPhase;
