//! Protocol module - wire constants, line framing, and command types.
//!
//! The controller speaks a text protocol:
//! - every line, in both directions, ends with `CRLF`
//! - a line is `COMMAND` optionally followed by `|`-separated arguments
//! - no length prefix and no escaping of either delimiter

mod line;
mod line_buffer;
mod request;

pub use line::{Command, Line};
pub use line_buffer::{LineBuffer, DEFAULT_BUFFER_CAPACITY};
pub use request::Request;

/// Line terminator (carriage return + line feed).
pub const CRLF: &[u8; 2] = b"\r\n";

/// Separator between a command and its arguments.
pub const SEPARATOR: char = '|';

/// Default TCP port the controller listens on.
pub const DEFAULT_PORT: u16 = 7348;

/// Lowest accepted master fader position.
pub const FADER_MIN: f64 = -100.0;

/// Highest accepted master fader position.
pub const FADER_MAX: f64 = 100.0;
