//! Event identifiers and wire types exchanged with the host plugin

use serde::{Deserialize, Serialize};

/// Namespace every debug panel event id starts with
pub const DEFAULT_NAMESPACE: &str = "com.adobe.csxs.events.latex2ai";
/// Target application the commands are addressed to
pub const DEFAULT_DESTINATION: &str = "ILST";
/// Extension id of the UI bundle this panel belongs to
pub const DEFAULT_APPLICATION_ID: &str = "LaTeX2AIUI";
/// Emitted by the host whenever its skin colors change
pub const THEME_COLOR_CHANGED_EVENT: &str = "com.adobe.csxs.events.ThemeColorChanged";

/// Build a fully qualified event id from a namespace and a suffix
pub fn qualified_id(namespace: &str, suffix: &str) -> String {
    format!("{}.{}", namespace, suffix)
}

/// Commands the panel sends to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelCommand {
    /// Handlers are registered, the host may send data
    Ready,
    /// Return to editing the LaTeX code
    Ok,
    /// Abort the current item action
    Cancel,
    /// Open the LaTeX log file
    OpenLog,
    /// Copy the LaTeX sources into a debug folder
    CreateDebug,
}

impl PanelCommand {
    pub const ALL: [PanelCommand; 5] = [
        PanelCommand::Ready,
        PanelCommand::Ok,
        PanelCommand::Cancel,
        PanelCommand::OpenLog,
        PanelCommand::CreateDebug,
    ];

    /// Event id suffix below the namespace
    pub fn suffix(&self) -> &'static str {
        match self {
            PanelCommand::Ready => "debug.ready",
            PanelCommand::Ok => "debug.ok",
            PanelCommand::Cancel => "debug.cancel",
            PanelCommand::OpenLog => "debug.open_log",
            PanelCommand::CreateDebug => "debug.create_debug",
        }
    }

    /// Resolve a fully qualified id back into a command
    pub fn from_event_id(namespace: &str, id: &str) -> Option<Self> {
        let suffix = id.strip_prefix(namespace)?.strip_prefix('.')?;
        Self::ALL.into_iter().find(|command| command.suffix() == suffix)
    }
}

/// Inbound event kinds the panel reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundKind {
    ThemeChanged,
    StatusUpdate,
    CloseRequested,
}

impl InboundKind {
    pub const ALL: [InboundKind; 3] = [
        InboundKind::ThemeChanged,
        InboundKind::StatusUpdate,
        InboundKind::CloseRequested,
    ];

    /// Fully qualified event id this kind is delivered under
    pub fn event_id(&self, namespace: &str) -> String {
        match self {
            InboundKind::ThemeChanged => THEME_COLOR_CHANGED_EVENT.to_string(),
            InboundKind::StatusUpdate => qualified_id(namespace, "debug.update"),
            InboundKind::CloseRequested => qualified_id(namespace, "debug.close"),
        }
    }
}

/// Where outbound commands come from and are addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub namespace: String,
    pub destination: String,
    pub application_id: String,
}

impl Default for Routing {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            application_id: DEFAULT_APPLICATION_ID.to_string(),
        }
    }
}

/// Origin of a command event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSource {
    Application,
}

/// An outbound command, built fresh for every dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEvent {
    id: String,
    source: EventSource,
    destination: String,
    application_id: String,
    payload: String,
}

impl CommandEvent {
    pub fn new(command: PanelCommand, routing: &Routing, payload: impl Into<String>) -> Self {
        Self {
            id: qualified_id(&routing.namespace, command.suffix()),
            source: EventSource::Application,
            destination: routing.destination.clone(),
            application_id: routing.application_id.clone(),
            payload: payload.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    #[cfg(test)]
    pub fn source(&self) -> EventSource {
        self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    #[cfg(test)]
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    #[cfg(test)]
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// An event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub id: String,
    #[serde(default)]
    pub payload: String,
}

impl InboundEvent {
    pub fn new(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// Build an event of the given kind under a namespace
    pub fn of_kind(kind: InboundKind, namespace: &str, payload: impl Into<String>) -> Self {
        Self::new(kind.event_id(namespace), payload)
    }
}
