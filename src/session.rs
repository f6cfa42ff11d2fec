//! Connection state and inbound line dispatch.
//!
//! A [`Session`] owns the receive buffer and the connected flag for one
//! connection. It knows nothing about sockets: the client's read loop feeds
//! it raw chunks and forwards the returned events.
//!
//! # Example
//!
//! ```
//! use tlc_client::{Event, Session};
//!
//! let mut session = Session::new();
//!
//! let events = session.on_bytes_received(b"HELLO\r\nFADER_CHANGE|my fader|25\r\nBPM");
//!
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::Connected,
//!         Event::FaderChange { name: "my fader".into(), value: 25.0 },
//!     ]
//! );
//! assert!(session.is_connected());
//! assert_eq!(session.buffered(), b"BPM");
//! ```

use crate::button_list::{parse_number, ButtonList};
use crate::event::{ErrorEvent, Event};
use crate::protocol::{Command, Line, LineBuffer};

/// Per-connection protocol state.
#[derive(Default)]
pub struct Session {
    buffer: LineBuffer,
    connected: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and dispatch every line it completes, in order.
    pub fn on_bytes_received(&mut self, chunk: &[u8]) -> Vec<Event> {
        self.buffer
            .push(chunk)
            .iter()
            .map(|line| self.handle_line(line))
            .collect()
    }

    /// Classify one complete line and build its event.
    pub fn handle_line(&mut self, raw: &str) -> Event {
        let line = Line::parse(raw);
        let arg = |index: usize| line.argument(index).map(str::to_string);

        match line.command() {
            Command::Hello => {
                tracing::debug!("Handshake accepted");
                self.connected = true;
                Event::Connected
            }
            Command::BeatOn => Event::BeatOn,
            Command::BeatOff => Event::BeatOff,
            Command::ButtonPress => Event::ButtonPress {
                name: arg(0).unwrap_or_default(),
            },
            Command::ButtonRelease => Event::ButtonRelease {
                name: arg(0).unwrap_or_default(),
            },
            Command::FaderChange => Event::FaderChange {
                name: arg(0).unwrap_or_default(),
                value: line.argument(1).map_or(f64::NAN, parse_number),
            },
            Command::InterfaceChange => Event::InterfaceChange { detail: arg(0) },
            Command::Bpm => Event::Bpm { value: arg(0) },
            Command::ButtonList => Self::button_list(line.argument(0).unwrap_or_default()),
            Command::Error => {
                let err = ErrorEvent::server(line.argument(0));
                tracing::warn!(kind = %err.kind, "Controller reported an error");
                Event::Error(err)
            }
            Command::Unknown => {
                tracing::debug!(command = line.name(), "Unknown command");
                Event::UnknownEvent {
                    line: raw.to_string(),
                }
            }
        }
    }

    fn button_list(raw: &str) -> Event {
        match ButtonList::from_xml(raw) {
            Ok(list) => Event::ButtonList(list),
            Err(e) => {
                tracing::warn!("Failed to decode button list: {}", e);
                Event::Error(ErrorEvent::xml_parse(raw, e))
            }
        }
    }

    /// The transport closed.
    pub fn on_close(&mut self) -> Event {
        self.connected = false;
        Event::Disconnected
    }

    /// The transport reported an error.
    pub fn on_transport_error(&self, err: &std::io::Error) -> Event {
        tracing::error!("Socket error: {}", err);
        Event::Error(ErrorEvent::socket(err))
    }

    /// Whether the controller accepted the handshake.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Bytes of the trailing partial line.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.remaining()
    }
}
