//! Host protocol
//!
//! Event ids, routing information and the status payload format shared by
//! the bridge, the panel controller and the demo host.

pub mod events;
pub mod payload;

pub use events::{CommandEvent, InboundEvent, InboundKind, PanelCommand, Routing};
pub use payload::{parse_status, Action, ParsedStatus, StatusPayload};
