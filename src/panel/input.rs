//! User gestures and their mapping to host commands

use egui::{Key, Modifiers};

use crate::protocol::PanelCommand;

/// Something the user did that the host should hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Confirm,
    Cancel,
    OpenLog,
    CreateDebug,
    /// Escape key, equivalent to confirm
    Escape,
}

impl Gesture {
    pub fn command(&self) -> PanelCommand {
        match self {
            Gesture::Confirm | Gesture::Escape => PanelCommand::Ok,
            Gesture::Cancel => PanelCommand::Cancel,
            Gesture::OpenLog => PanelCommand::OpenLog,
            Gesture::CreateDebug => PanelCommand::CreateDebug,
        }
    }
}

/// A gesture plus whether its default platform behavior was suppressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureEvent {
    gesture: Gesture,
    suppressions: u32,
}

impl GestureEvent {
    pub fn new(gesture: Gesture) -> Self {
        Self {
            gesture,
            suppressions: 0,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn prevent_default(&mut self) {
        self.suppressions += 1;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.suppressions > 0
    }

    /// How many times `prevent_default` was called
    #[cfg(test)]
    pub fn suppression_count(&self) -> u32 {
        self.suppressions
    }
}

/// Escape press this frame, identified by egui's key identity
pub fn escape_gesture(ctx: &egui::Context) -> Option<GestureEvent> {
    ctx.input(|i| i.key_pressed(Key::Escape))
        .then(|| GestureEvent::new(Gesture::Escape))
}

/// Keep egui from acting on an Escape press the panel already handled
pub fn suppress_escape(ctx: &egui::Context) {
    ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Escape));
}
