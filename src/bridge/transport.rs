//! Transports carrying events between the panel and its host

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::BridgeError;
use crate::protocol::{CommandEvent, InboundEvent};

/// Outbound half of the host channel
pub trait Transport {
    /// Hand a command to the host. No acknowledgment is expected.
    fn dispatch(&mut self, event: &CommandEvent) -> Result<(), BridgeError>;

    /// Tell the host the panel window is being torn down
    fn close_window(&mut self) -> Result<(), BridgeError>;
}

/// Messages arriving at the host end of a channel transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostBound {
    Command(CommandEvent),
    WindowClosed,
}

/// Host side of an in-process channel pair
pub struct HostEndpoint {
    /// Commands sent by the panel
    pub from_panel: Receiver<HostBound>,
    /// Events delivered to the panel
    pub to_panel: Sender<InboundEvent>,
}

/// In-process transport backed by crossbeam channels
pub struct ChannelTransport {
    outbound: Sender<HostBound>,
}

impl ChannelTransport {
    /// Create a connected transport, the panel's inbound queue and the host endpoint
    pub fn pair() -> (Self, Receiver<InboundEvent>, HostEndpoint) {
        let (outbound, from_panel) = unbounded();
        let (to_panel, inbound) = unbounded();
        (
            Self { outbound },
            inbound,
            HostEndpoint {
                from_panel,
                to_panel,
            },
        )
    }
}

impl Transport for ChannelTransport {
    fn dispatch(&mut self, event: &CommandEvent) -> Result<(), BridgeError> {
        self.outbound
            .send(HostBound::Command(event.clone()))
            .map_err(|_| BridgeError::ChannelClosed)
    }

    fn close_window(&mut self) -> Result<(), BridgeError> {
        self.outbound
            .send(HostBound::WindowClosed)
            .map_err(|_| BridgeError::ChannelClosed)
    }
}

/// One line of outbound JSON
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutboundLine<'a> {
    Command(&'a CommandEvent),
    CloseWindow,
}

/// Newline-delimited JSON over any writer, typically stdout
pub struct JsonLinesTransport<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &OutboundLine<'_>) -> Result<(), BridgeError> {
        serde_json::to_writer(&mut self.writer, line)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Transport for JsonLinesTransport<W> {
    fn dispatch(&mut self, event: &CommandEvent) -> Result<(), BridgeError> {
        self.write_line(&OutboundLine::Command(event))
    }

    fn close_window(&mut self) -> Result<(), BridgeError> {
        self.write_line(&OutboundLine::CloseWindow)
    }
}

/// Read inbound JSON lines on a background thread and queue them for the UI.
///
/// `notify` runs after every queued event so the UI can wake up.
pub fn spawn_line_reader<R, F>(reader: R, sender: Sender<InboundEvent>, notify: F) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
    F: Fn() + Send + 'static,
{
    std::thread::spawn(move || {
        info!("Inbound reader started");
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read inbound line: {}", e);
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<InboundEvent>(line) {
                Ok(event) => {
                    debug!("Inbound event: {}", event.id);
                    if sender.send(event).is_err() {
                        break;
                    }
                    notify();
                }
                Err(e) => warn!("Ignoring unreadable inbound line: {}", e),
            }
        }
        info!("Inbound reader exiting");
    })
}
