//! Panel Controller
//!
//! Owns the form state, turns inbound host events into state changes and
//! user gestures into outbound commands.

use tracing::{debug, error, info, warn};

use crate::bridge::{EventBridge, HostMessage, Transport};
use crate::error::BridgeError;
use crate::panel::input::GestureEvent;
use crate::panel::state::{PanelPhase, PanelUiState};
use crate::protocol::{parse_status, InboundEvent, InboundKind, PanelCommand, ParsedStatus};

/// Mismatch between the host's build token and the one this panel expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMismatch {
    pub expected: String,
    pub received: String,
}

pub struct PanelController<T: Transport> {
    bridge: EventBridge<T>,
    ui_state: PanelUiState,
    phase: PanelPhase,
    expected_token: Option<String>,
    token_mismatch: Option<TokenMismatch>,
    pending_themes: Vec<String>,
}

impl<T: Transport> PanelController<T> {
    pub fn new(bridge: EventBridge<T>, expected_token: Option<String>) -> Self {
        Self {
            bridge,
            ui_state: PanelUiState::default(),
            phase: PanelPhase::Starting,
            expected_token,
            token_mismatch: None,
            pending_themes: Vec::new(),
        }
    }

    /// Register the inbound handlers, then tell the host the panel is ready
    pub fn start(&mut self) -> Result<(), BridgeError> {
        if self.phase != PanelPhase::Starting {
            warn!("Panel already started");
            return Ok(());
        }

        let namespace = self.bridge.routing().namespace.clone();
        for kind in InboundKind::ALL {
            self.bridge.register(kind.event_id(&namespace), kind);
        }

        self.phase = PanelPhase::Ready;
        info!("Debug panel ready ({} handlers)", self.bridge.handler_count());
        self.bridge.send(PanelCommand::Ready, "")
    }

    /// Process one inbound event
    pub fn handle_event(&mut self, event: InboundEvent) {
        match self.bridge.route(event) {
            Some(HostMessage::ThemeChanged(payload)) => self.pending_themes.push(payload),
            Some(HostMessage::StatusUpdate(payload)) => self.handle_status_update(&payload),
            Some(HostMessage::CloseRequested) => self.close(),
            None => {}
        }
    }

    /// Apply a status payload to the form state
    pub fn handle_status_update(&mut self, payload: &str) {
        let parsed = parse_status(payload);

        if let ParsedStatus::Malformed(e) = &parsed {
            warn!("Ignoring status update: {}", e);
            return;
        }

        self.check_token(parsed.token());

        let ParsedStatus::Valid(status) = parsed else {
            debug!("Status update without form data");
            return;
        };

        match status.action {
            Some(action) => {
                if self.ui_state.apply(&action) {
                    info!("Applied action {}", action.as_str());
                } else {
                    debug!("Ignoring unknown action {}", action.as_str());
                }
            }
            None => debug!("Status update without action"),
        }
    }

    fn check_token(&mut self, received: Option<&str>) {
        let (Some(expected), Some(received)) = (self.expected_token.as_deref(), received) else {
            return;
        };

        if expected == received {
            self.token_mismatch = None;
        } else {
            warn!(
                "Host build token {} does not match panel build token {}",
                received, expected
            );
            self.token_mismatch = Some(TokenMismatch {
                expected: expected.to_string(),
                received: received.to_string(),
            });
        }
    }

    /// Suppress the gesture's default behavior and send its command
    pub fn handle_gesture(&mut self, event: &mut GestureEvent) {
        event.prevent_default();

        if self.phase != PanelPhase::Ready {
            debug!("Ignoring {:?} while {:?}", event.gesture(), self.phase);
            return;
        }

        let command = event.gesture().command();
        if let Err(e) = self.bridge.send(command, "") {
            error!("Failed to send {}: {}", command.suffix(), e);
        }
    }

    /// Tear down the panel window
    pub fn close(&mut self) {
        self.phase = PanelPhase::Closing;
        if let Err(e) = self.bridge.close() {
            error!("Failed to close panel: {}", e);
        }
    }

    pub fn ui_state(&self) -> &PanelUiState {
        &self.ui_state
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn token_mismatch(&self) -> Option<&TokenMismatch> {
        self.token_mismatch.as_ref()
    }

    /// Theme payloads received since the last call, oldest first
    pub fn take_themes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_themes)
    }

    #[cfg(test)]
    pub fn bridge(&self) -> &EventBridge<T> {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{ChannelTransport, HostBound, HostEndpoint};
    use crate::panel::input::Gesture;
    use crate::panel::state::{CANCEL_CREATION_LABEL, CANCEL_EDIT_LABEL, REDO_ITEMS_MESSAGE};
    use crate::protocol::events::THEME_COLOR_CHANGED_EVENT;
    use crate::protocol::{CommandEvent, Routing};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn started(expected_token: Option<&str>) -> (PanelController<ChannelTransport>, HostEndpoint) {
        let (transport, _inbound, host) = ChannelTransport::pair();
        let bridge = EventBridge::new(Routing::default(), transport);
        let mut controller = PanelController::new(bridge, expected_token.map(str::to_string));
        controller.start().unwrap();
        host.from_panel.try_iter().for_each(drop);
        (controller, host)
    }

    fn update(markup: &str) -> InboundEvent {
        InboundEvent::of_kind(
            InboundKind::StatusUpdate,
            &Routing::default().namespace,
            markup,
        )
    }

    fn sent(host: &HostEndpoint) -> Vec<CommandEvent> {
        host.from_panel
            .try_iter()
            .filter_map(|message| match message {
                HostBound::Command(event) => Some(event),
                HostBound::WindowClosed => None,
            })
            .collect()
    }

    #[test]
    fn test_start_registers_then_sends_ready_once() {
        let (transport, _inbound, host) = ChannelTransport::pair();
        let mut controller = PanelController::new(EventBridge::new(Routing::default(), transport), None);
        assert_eq!(controller.phase(), PanelPhase::Starting);

        controller.start().unwrap();
        controller.start().unwrap();

        let bridge = controller.bridge();
        assert_eq!(bridge.handler_count(), 3);
        assert!(bridge.is_registered(THEME_COLOR_CHANGED_EVENT));
        assert!(bridge.is_registered("com.adobe.csxs.events.latex2ai.debug.update"));
        assert!(bridge.is_registered("com.adobe.csxs.events.latex2ai.debug.close"));

        let events = sent(&host);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id(), "com.adobe.csxs.events.latex2ai.debug.ready");
        assert!(events[0].payload().is_empty());
        assert_eq!(controller.phase(), PanelPhase::Ready);
    }

    /// Records the outbound commands and refuses to deliver them
    struct RefusingTransport {
        attempts: Rc<RefCell<Vec<String>>>,
    }

    impl Transport for RefusingTransport {
        fn dispatch(&mut self, event: &CommandEvent) -> Result<(), BridgeError> {
            self.attempts.borrow_mut().push(event.id().to_string());
            Err(BridgeError::ChannelClosed)
        }

        fn close_window(&mut self) -> Result<(), BridgeError> {
            Err(BridgeError::ChannelClosed)
        }
    }

    #[test]
    fn test_handlers_are_registered_before_ready_is_sent() {
        let attempts = Rc::new(RefCell::new(Vec::new()));
        let transport = RefusingTransport {
            attempts: attempts.clone(),
        };
        let mut controller = PanelController::new(EventBridge::new(Routing::default(), transport), None);

        // The ready send fails, so any registration still done must have come first
        assert!(matches!(controller.start(), Err(BridgeError::ChannelClosed)));
        assert_eq!(controller.bridge().handler_count(), 3);
        assert_eq!(
            *attempts.borrow(),
            vec!["com.adobe.csxs.events.latex2ai.debug.ready".to_string()]
        );
    }

    #[test]
    fn test_item_edit_sample() {
        let (mut controller, _host) = started(None);
        let before = controller.ui_state().clone();

        controller.handle_event(update(r#"<root><form_data action="item_edit"/></root>"#));

        let state = controller.ui_state();
        assert_eq!(state.cancel_label, "Cancel item edit");
        assert_eq!(state.cancel_label, CANCEL_EDIT_LABEL);
        assert_eq!(state.confirm_enabled, before.confirm_enabled);
        assert_eq!(state.info_text, before.info_text);
    }

    #[test]
    fn test_redo_items_disables_confirm() {
        let (mut controller, _host) = started(None);
        controller.handle_event(update(r#"<root><form_data action="item_create"/></root>"#));
        controller.handle_event(update(r#"<root><form_data action="redo_items"/></root>"#));

        let state = controller.ui_state();
        assert!(!state.confirm_enabled);
        assert_eq!(state.info_text, REDO_ITEMS_MESSAGE);
        assert_eq!(state.cancel_label, CANCEL_CREATION_LABEL);
    }

    #[test]
    fn test_no_op_payloads_leave_state_unchanged() {
        let (mut controller, _host) = started(None);
        controller.handle_event(update(r#"<root><form_data action="item_create"/></root>"#));
        let before = controller.ui_state().clone();

        for markup in [
            "<root/>",
            "<root><git_hash>abc</git_hash></root>",
            "<root><form_data/></root>",
            r#"<root><form_data action="item_delete"/></root>"#,
            r#"<root><form_data action=""/></root>"#,
            "<root><form_data",
            "",
        ] {
            controller.handle_event(update(markup));
            assert_eq!(controller.ui_state(), &before, "payload {:?}", markup);
        }
    }

    #[test]
    fn test_token_mismatch_is_reported_but_not_blocking() {
        let (mut controller, _host) = started(Some("abc"));

        controller.handle_event(update(
            r#"<root><git_hash>def</git_hash><form_data action="item_edit"/></root>"#,
        ));

        assert_eq!(
            controller.token_mismatch(),
            Some(&TokenMismatch {
                expected: "abc".to_string(),
                received: "def".to_string(),
            })
        );
        assert_eq!(controller.ui_state().cancel_label, CANCEL_EDIT_LABEL);

        controller.handle_event(update(r#"<root><git_hash>abc</git_hash><form_data/></root>"#));
        assert!(controller.token_mismatch().is_none());
    }

    #[test]
    fn test_token_without_baseline_is_accepted() {
        let (mut controller, _host) = started(None);
        controller.handle_event(update("<root><git_hash>def</git_hash><form_data/></root>"));
        assert!(controller.token_mismatch().is_none());
    }

    #[test]
    fn test_each_gesture_sends_one_event() {
        let cases = [
            (Gesture::Confirm, "debug.ok"),
            (Gesture::OpenLog, "debug.open_log"),
            (Gesture::CreateDebug, "debug.create_debug"),
            (Gesture::Cancel, "debug.cancel"),
            (Gesture::Escape, "debug.ok"),
        ];

        for (gesture, suffix) in cases {
            let (mut controller, host) = started(None);
            let mut event = GestureEvent::new(gesture);

            controller.handle_gesture(&mut event);

            let events = sent(&host);
            assert_eq!(events.len(), 1, "{:?}", gesture);
            assert_eq!(events[0].id(), format!("com.adobe.csxs.events.latex2ai.{}", suffix));
            assert!(events[0].payload().is_empty());
            assert_eq!(event.suppression_count(), 1);
        }
    }

    #[test]
    fn test_escape_matches_confirm() {
        let (mut controller, host) = started(None);

        controller.handle_gesture(&mut GestureEvent::new(Gesture::Confirm));
        controller.handle_gesture(&mut GestureEvent::new(Gesture::Escape));

        let events = sent(&host);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], events[1]);
    }

    #[test]
    fn test_ok_and_cancel_do_not_close_locally() {
        let (mut controller, _host) = started(None);
        controller.handle_gesture(&mut GestureEvent::new(Gesture::Confirm));
        controller.handle_gesture(&mut GestureEvent::new(Gesture::Cancel));
        assert_eq!(controller.phase(), PanelPhase::Ready);
    }

    #[test]
    fn test_close_request_from_host() {
        let (mut controller, host) = started(None);

        controller.handle_event(InboundEvent::of_kind(
            InboundKind::CloseRequested,
            &Routing::default().namespace,
            "",
        ));

        assert_eq!(controller.phase(), PanelPhase::Closing);
        assert_eq!(host.from_panel.try_recv().unwrap(), HostBound::WindowClosed);

        let mut event = GestureEvent::new(Gesture::Confirm);
        controller.handle_gesture(&mut event);
        assert!(event.is_default_prevented());
        assert!(sent(&host).is_empty());
    }

    #[test]
    fn test_theme_payloads_are_handed_over_in_order() {
        let (mut controller, _host) = started(None);
        controller.handle_event(InboundEvent::new(THEME_COLOR_CHANGED_EVENT, "{\"base_font_size\":14}"));
        controller.handle_event(InboundEvent::new(THEME_COLOR_CHANGED_EVENT, "{\"base_font_size\":16}"));

        assert_eq!(
            controller.take_themes(),
            vec![
                "{\"base_font_size\":14}".to_string(),
                "{\"base_font_size\":16}".to_string(),
            ]
        );
        assert!(controller.take_themes().is_empty());
    }

    #[test]
    fn test_send_failure_does_not_panic() {
        let (mut controller, host) = started(None);
        drop(host);
        controller.handle_gesture(&mut GestureEvent::new(Gesture::OpenLog));
        controller.handle_event(InboundEvent::of_kind(
            InboundKind::CloseRequested,
            &Routing::default().namespace,
            "",
        ));
        assert_eq!(controller.phase(), PanelPhase::Closing);
    }

    #[test]
    fn test_events_before_start_are_dropped() {
        let (transport, _inbound, _host) = ChannelTransport::pair();
        let mut controller = PanelController::new(EventBridge::new(Routing::default(), transport), None);

        controller.handle_event(update(r#"<root><form_data action="redo_items"/></root>"#));

        assert!(controller.ui_state().confirm_enabled);
    }
}
