//! Events delivered to the caller.
//!
//! Every inbound line becomes exactly one [`Event`]. Errors from every
//! source (socket, server, XML decoding, local validation) arrive as
//! [`Event::Error`] and are built through [`ErrorEvent::from_parts`], which
//! assigns [`ErrorKind::Unknown`] when no kind is known.

use std::fmt;

use crate::button_list::ButtonList;
use crate::error::ClientError;

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Handshake accepted (`HELLO`).
    Connected,
    /// Socket closed.
    Disconnected,
    /// Controller wants beats (`BEAT_ON`).
    BeatOn,
    /// Controller stopped wanting beats (`BEAT_OFF`).
    BeatOff,
    ButtonPress { name: String },
    ButtonRelease { name: String },
    /// A master fader moved. `value` is NaN when the controller sent no number.
    FaderChange { name: String, value: f64 },
    /// Buttons or faders changed in the controller's interface.
    InterfaceChange { detail: Option<String> },
    /// `BPM` line; without a value it asks this client for its BPM.
    Bpm { value: Option<String> },
    /// Decoded response to a `BUTTON_LIST` request.
    ButtonList(ButtonList),
    Error(ErrorEvent),
    /// A line with an unrecognized command, passed through verbatim.
    UnknownEvent { line: String },
}

/// Category of an error event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The socket reported an error (`SOCKET`).
    Socket,
    /// `ERROR|{kind}` from the controller, e.g. `BAD PASSWORD` or `NOT LOGGED`.
    Server(String),
    /// `BUTTON LIST XML PARSE FAILED`
    ButtonListXmlParseFailed,
    /// An outbound command failed local validation (`CLIENT ERROR`).
    Client,
    /// `UNKNOWN ERROR`
    Unknown,
}

impl ErrorKind {
    /// The kind as it is spelled on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Socket => "SOCKET",
            ErrorKind::Server(kind) => kind.as_str(),
            ErrorKind::ButtonListXmlParseFailed => "BUTTON LIST XML PARSE FAILED",
            ErrorKind::Client => "CLIENT ERROR",
            ErrorKind::Unknown => "UNKNOWN ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra information attached to an error event.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// Description of the underlying socket error.
    Socket(String),
    /// The payload that failed to decode and the decoder's message.
    XmlParse { raw: String, error: String },
    /// Which validation rejected an outbound command.
    Client(ClientError),
}

/// Uniform error payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub kind: ErrorKind,
    pub detail: Option<ErrorDetail>,
}

impl ErrorEvent {
    /// Build an error event, falling back to [`ErrorKind::Unknown`].
    pub fn from_parts(kind: Option<ErrorKind>, detail: Option<ErrorDetail>) -> Self {
        let kind = match kind {
            Some(ErrorKind::Server(kind)) if kind.is_empty() => ErrorKind::Unknown,
            Some(kind) => kind,
            None => ErrorKind::Unknown,
        };
        Self { kind, detail }
    }

    /// Error reported by the controller after `ERROR|`.
    pub fn server(kind: Option<&str>) -> Self {
        Self::from_parts(kind.map(|k| ErrorKind::Server(k.to_string())), None)
    }

    /// Socket-level failure.
    pub fn socket(err: &std::io::Error) -> Self {
        Self::from_parts(
            Some(ErrorKind::Socket),
            Some(ErrorDetail::Socket(err.to_string())),
        )
    }

    /// Button-list payload that could not be decoded.
    pub fn xml_parse(raw: &str, error: impl fmt::Display) -> Self {
        Self::from_parts(
            Some(ErrorKind::ButtonListXmlParseFailed),
            Some(ErrorDetail::XmlParse {
                raw: raw.to_string(),
                error: error.to_string(),
            }),
        )
    }

    /// Local validation failure.
    pub fn client(err: ClientError) -> Self {
        Self::from_parts(Some(ErrorKind::Client), Some(ErrorDetail::Client(err)))
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            None => write!(f, "{}", self.kind),
            Some(ErrorDetail::Socket(msg)) => write!(f, "{}: {}", self.kind, msg),
            Some(ErrorDetail::XmlParse { error, .. }) => write!(f, "{}: {}", self.kind, error),
            Some(ErrorDetail::Client(err)) => write!(f, "{}: {}", self.kind, err),
        }
    }
}

impl From<ErrorEvent> for Event {
    fn from(err: ErrorEvent) -> Self {
        Event::Error(err)
    }
}

impl From<ClientError> for ErrorEvent {
    fn from(err: ClientError) -> Self {
        ErrorEvent::client(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_kind_becomes_unknown() {
        let err = ErrorEvent::from_parts(None, None);
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.kind.as_str(), "UNKNOWN ERROR");
    }

    #[test]
    fn test_empty_server_kind_becomes_unknown() {
        assert_eq!(ErrorEvent::server(Some("")).kind, ErrorKind::Unknown);
        assert_eq!(ErrorEvent::server(None).kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_server_kind_is_verbatim() {
        let err = ErrorEvent::server(Some("BAD PASSWORD"));
        assert_eq!(err.kind.as_str(), "BAD PASSWORD");
        assert_eq!(err.detail, None);
    }

    #[test]
    fn test_socket_error_carries_detail() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = ErrorEvent::socket(&io);

        assert_eq!(err.kind.as_str(), "SOCKET");
        assert_eq!(err.detail, Some(ErrorDetail::Socket("reset by peer".into())));
    }

    #[test]
    fn test_client_error_display() {
        let err = ErrorEvent::client(ClientError::InvalidFaderValue);

        assert_eq!(err.kind.as_str(), "CLIENT ERROR");
        assert_eq!(err.to_string(), "CLIENT ERROR: invalid fader value");
    }

    #[test]
    fn test_xml_parse_keeps_raw_payload() {
        let err = ErrorEvent::xml_parse("<buttons>", "unclosed element <buttons>");

        assert_eq!(err.kind, ErrorKind::ButtonListXmlParseFailed);
        assert_eq!(
            err.detail,
            Some(ErrorDetail::XmlParse {
                raw: "<buttons>".into(),
                error: "unclosed element <buttons>".into(),
            })
        );
    }
}
