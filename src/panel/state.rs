//! Visible form state of the debug panel

use crate::protocol::Action;

pub const FORM_TITLE: &str = "LaTeX2AI debug LaTeX code";
pub const DEFAULT_CONFIRM_LABEL: &str = "OK";
pub const DEFAULT_CANCEL_LABEL: &str = "Cancel";
pub const CANCEL_CREATION_LABEL: &str = "Cancel item creation";
pub const CANCEL_EDIT_LABEL: &str = "Cancel item edit";
pub const REDO_ITEMS_MESSAGE: &str = "The error occurred while recompiling items that were not changed.\nThis usually happens when something in the header changes or the document is compiled on a different system than before.";

/// Lifecycle of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPhase {
    /// Handlers not registered yet
    #[default]
    Starting,
    /// `ready` sent, reacting to events
    Ready,
    /// Close requested, no further commands are sent
    Closing,
}

/// Widget properties the host can influence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelUiState {
    pub confirm_enabled: bool,
    pub confirm_label: String,
    pub cancel_label: String,
    pub info_text: String,
}

impl Default for PanelUiState {
    fn default() -> Self {
        Self {
            confirm_enabled: true,
            confirm_label: DEFAULT_CONFIRM_LABEL.to_string(),
            cancel_label: DEFAULT_CANCEL_LABEL.to_string(),
            info_text: String::new(),
        }
    }
}

impl PanelUiState {
    /// Apply an action. Only the fields the action governs are touched.
    ///
    /// Returns whether the action is one this panel understands.
    pub fn apply(&mut self, action: &Action) -> bool {
        match action {
            Action::RedoItems => {
                self.confirm_enabled = false;
                self.info_text = REDO_ITEMS_MESSAGE.to_string();
            }
            Action::ItemCreate => self.cancel_label = CANCEL_CREATION_LABEL.to_string(),
            Action::ItemEdit => self.cancel_label = CANCEL_EDIT_LABEL.to_string(),
            Action::Unknown(_) => return false,
        }
        true
    }
}
