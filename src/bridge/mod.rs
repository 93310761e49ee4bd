//! Event Bridge
//!
//! Wraps the channel to the host plugin. Outbound commands get this panel's
//! fixed routing triple; inbound events are routed by id through a registry
//! filled once at startup.

pub mod transport;

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::BridgeError;
use crate::protocol::{CommandEvent, InboundEvent, InboundKind, PanelCommand, Routing};

pub use transport::{ChannelTransport, HostBound, HostEndpoint, JsonLinesTransport, Transport};

/// An inbound event after routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    /// Opaque skin description for the theme layer
    ThemeChanged(String),
    /// Status payload markup
    StatusUpdate(String),
    /// The host wants the panel window gone
    CloseRequested,
}

/// Bidirectional messaging with the host
pub struct EventBridge<T: Transport> {
    routing: Routing,
    transport: T,
    handlers: HashMap<String, InboundKind>,
    closing: bool,
}

impl<T: Transport> EventBridge<T> {
    pub fn new(routing: Routing, transport: T) -> Self {
        Self {
            routing,
            transport,
            handlers: HashMap::new(),
            closing: false,
        }
    }

    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    /// Associate an inbound event id with a handler kind. Last registration wins.
    pub fn register(&mut self, event_id: impl Into<String>, kind: InboundKind) {
        let event_id = event_id.into();
        debug!("Registering handler {:?} for {}", kind, event_id);
        if let Some(previous) = self.handlers.insert(event_id.clone(), kind) {
            warn!(
                "Handler for {} registered twice ({:?} replaced by {:?})",
                event_id, previous, kind
            );
        }
    }

    /// Number of registered inbound handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    #[cfg(test)]
    pub fn is_registered(&self, event_id: &str) -> bool {
        self.handlers.contains_key(event_id)
    }

    /// Send a command with this panel's routing. Fire-and-forget.
    pub fn send(&mut self, command: PanelCommand, payload: impl Into<String>) -> Result<(), BridgeError> {
        let event = CommandEvent::new(command, &self.routing, payload);
        debug!("Sending {} to {}", event.id(), event.destination());
        self.transport.dispatch(&event)
    }

    /// Ask for the panel window to be torn down
    pub fn close(&mut self) -> Result<(), BridgeError> {
        if self.closing {
            return Ok(());
        }
        info!("Closing debug panel");
        self.closing = true;
        self.transport.close_window()
    }

    #[cfg(test)]
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Look up the handler for an inbound event
    pub fn route(&self, event: InboundEvent) -> Option<HostMessage> {
        let Some(kind) = self.handlers.get(&event.id) else {
            debug!("No handler registered for {}, dropping", event.id);
            return None;
        };

        Some(match kind {
            InboundKind::ThemeChanged => HostMessage::ThemeChanged(event.payload),
            InboundKind::StatusUpdate => HostMessage::StatusUpdate(event.payload),
            InboundKind::CloseRequested => HostMessage::CloseRequested,
        })
    }
}
