//! Inbound line classification.
//!
//! A [`Line`] borrows one delimiter-free protocol line and splits it into a
//! command and its `|`-separated arguments.
//!
//! # Example
//!
//! ```
//! use tlc_client::protocol::{Command, Line};
//!
//! let line = Line::parse("FADER_CHANGE|my fader|25");
//!
//! assert_eq!(line.command(), Command::FaderChange);
//! assert_eq!(line.argument(0), Some("my fader"));
//! assert_eq!(line.argument(1), Some("25"));
//! ```

use super::SEPARATOR;

/// Inbound commands sent by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `HELLO` - handshake accepted.
    Hello,
    /// `BEAT_ON` - start sending beats.
    BeatOn,
    /// `BEAT_OFF` - stop sending beats.
    BeatOff,
    /// `BUTTON_PRESS|{name}`
    ButtonPress,
    /// `BUTTON_RELEASE|{name}`
    ButtonRelease,
    /// `FADER_CHANGE|{name}|{value}`
    FaderChange,
    /// `INTERFACE_CHANGE` - buttons or faders were added, removed or renamed.
    InterfaceChange,
    /// `BPM` or `BPM|{value}`
    Bpm,
    /// `BUTTON_LIST|{xml}`
    ButtonList,
    /// `ERROR|{kind}`
    Error,
    /// Anything else.
    Unknown,
}

impl Command {
    /// Map a wire command name to its command.
    pub fn from_name(name: &str) -> Self {
        match name {
            "HELLO" => Command::Hello,
            "BEAT_ON" => Command::BeatOn,
            "BEAT_OFF" => Command::BeatOff,
            "BUTTON_PRESS" => Command::ButtonPress,
            "BUTTON_RELEASE" => Command::ButtonRelease,
            "FADER_CHANGE" => Command::FaderChange,
            "INTERFACE_CHANGE" => Command::InterfaceChange,
            "BPM" => Command::Bpm,
            "BUTTON_LIST" => Command::ButtonList,
            "ERROR" => Command::Error,
            _ => Command::Unknown,
        }
    }
}

/// A single protocol line split into command and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    raw: &'a str,
    name: &'a str,
    arguments: Vec<&'a str>,
}

impl<'a> Line<'a> {
    /// Split a raw line on the argument separator.
    pub fn parse(raw: &'a str) -> Self {
        let mut parts = raw.split(SEPARATOR);
        // split always yields at least one segment
        let name = parts.next().unwrap_or_default();

        Self {
            raw,
            name,
            arguments: parts.collect(),
        }
    }

    /// The command this line carries.
    pub fn command(&self) -> Command {
        Command::from_name(self.name)
    }

    /// The command name as received.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Argument at `index` (0 is the first segment after the command).
    #[inline]
    pub fn argument(&self, index: usize) -> Option<&'a str> {
        self.arguments.get(index).copied()
    }

    /// All arguments in order.
    pub fn arguments(&self) -> &[&'a str] {
        &self.arguments
    }

    /// The full line, untouched.
    pub fn raw(&self) -> &'a str {
        self.raw
    }
}
