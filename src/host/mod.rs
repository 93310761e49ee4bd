//! Loopback demo host
//!
//! Stands in for the plug-in when the panel runs on its own: answers `ready`
//! with a status update for a chosen action and closes the panel on
//! `ok`/`cancel`.

use std::thread::JoinHandle;
use tracing::{info, warn};

use crate::bridge::{HostBound, HostEndpoint};
use crate::protocol::events::THEME_COLOR_CHANGED_EVENT;
use crate::protocol::{Action, CommandEvent, InboundEvent, InboundKind, PanelCommand, StatusPayload};

/// Skin the demo host reports on startup
const DEMO_THEME: &str = r#"{"panel_background":[50,50,50],"base_font_size":13}"#;

pub struct DemoHost {
    namespace: String,
    status: StatusPayload,
}

impl DemoHost {
    pub fn new(namespace: impl Into<String>, action: Action, token: Option<String>) -> Self {
        let mut status = StatusPayload::new(action);
        status.token = token;
        Self {
            namespace: namespace.into(),
            status,
        }
    }

    /// Events the host sends back for one command
    pub fn respond(&self, event: &CommandEvent) -> Vec<InboundEvent> {
        let Some(command) = PanelCommand::from_event_id(&self.namespace, event.id()) else {
            warn!("Demo host ignoring unknown command {}", event.id());
            return Vec::new();
        };

        match command {
            PanelCommand::Ready => vec![
                InboundEvent::new(THEME_COLOR_CHANGED_EVENT, DEMO_THEME),
                InboundEvent::of_kind(
                    InboundKind::StatusUpdate,
                    &self.namespace,
                    self.status.to_markup(),
                ),
            ],
            PanelCommand::Ok | PanelCommand::Cancel => {
                info!("Demo host received {}, closing panel", command.suffix());
                vec![InboundEvent::of_kind(InboundKind::CloseRequested, &self.namespace, "")]
            }
            PanelCommand::OpenLog => {
                info!("Demo host would open the LaTeX log file");
                Vec::new()
            }
            PanelCommand::CreateDebug => {
                info!("Demo host would create the debug folder");
                Vec::new()
            }
        }
    }

    /// Serve the panel on a background thread until the window closes.
    ///
    /// `notify` runs after every batch of replies so the UI can wake up.
    pub fn spawn<F>(self, endpoint: HostEndpoint, notify: F) -> JoinHandle<()>
    where
        F: Fn() + Send + 'static,
    {
        std::thread::spawn(move || {
            info!("Demo host thread starting...");
            while let Ok(message) = endpoint.from_panel.recv() {
                match message {
                    HostBound::Command(event) => {
                        for reply in self.respond(&event) {
                            if endpoint.to_panel.send(reply).is_err() {
                                return;
                            }
                        }
                        notify();
                    }
                    HostBound::WindowClosed => break,
                }
            }
            info!("Demo host thread exiting...");
        })
    }
}
