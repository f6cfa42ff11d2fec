//! Outbound commands.
//!
//! Each [`Request`] encodes to a single in-memory line (`COMMAND`,
//! `COMMAND|arg1` or `COMMAND|arg1|arg2`). The `CRLF` delimiter is appended
//! by the writer task at the socket boundary, never here.
//!
//! Constructors that take user input validate it and return a
//! [`ClientError`] instead of building a line the controller would reject.
//!
//! # Example
//!
//! ```
//! use tlc_client::protocol::Request;
//! use tlc_client::ClientError;
//!
//! assert_eq!(Request::fader_change("0", 0.0).unwrap().encode(), "FADER_CHANGE|0|0");
//! assert_eq!(Request::fader_change("1", 101.0), Err(ClientError::InvalidFaderValue));
//! ```

use std::fmt;

use super::{FADER_MAX, FADER_MIN, SEPARATOR};
use crate::error::ClientError;

/// A command sent from this client to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// `HELLO|{app}|{password}` - must be the first line after connecting.
    Hello { app: String, password: String },
    /// `BPM` - ask the controller for its current BPM.
    RequestBpm,
    /// `BPM|{bpm}` - set the manual BPM.
    SetBpm(f64),
    /// `BEAT` - one tick of the auto BPM.
    Beat,
    /// `FREEZE_ON`
    FreezeOn,
    /// `FREEZE_OFF`
    FreezeOff,
    /// `AUTO_BPM_ON`
    AutoBpmOn,
    /// `AUTO_BPM_OFF`
    AutoBpmOff,
    /// `CUE|{name}` - toggles the button with that name.
    Cue(String),
    /// `BUTTON_PRESS|{name}`
    ButtonPress(String),
    /// `BUTTON_RELEASE|{name}`
    ButtonRelease(String),
    /// `FADER_CHANGE|{name}|{value}`
    FaderChange { name: String, value: f64 },
    /// `BUTTON_LIST` - ask for the page/button/fader layout.
    ButtonList,
}

impl Request {
    /// Build the handshake line.
    pub fn hello(app: impl Into<String>, password: impl Into<String>) -> Self {
        Request::Hello {
            app: app.into(),
            password: password.into(),
        }
    }

    /// Set the manual BPM. Rejects negative and non-numeric values.
    pub fn set_bpm(bpm: f64) -> Result<Self, ClientError> {
        if bpm.is_nan() || bpm < 0.0 {
            return Err(ClientError::InvalidBpm);
        }
        Ok(Request::SetBpm(bpm))
    }

    /// Toggle a button by name.
    pub fn cue(name: &str) -> Result<Self, ClientError> {
        non_empty(name, ClientError::InvalidCueName).map(Request::Cue)
    }

    /// Press a button by name.
    pub fn button_press(name: &str) -> Result<Self, ClientError> {
        non_empty(name, ClientError::InvalidButtonName).map(Request::ButtonPress)
    }

    /// Release a button by name.
    pub fn button_release(name: &str) -> Result<Self, ClientError> {
        non_empty(name, ClientError::InvalidButtonName).map(Request::ButtonRelease)
    }

    /// Move a master fader. `value` must lie in `[-100, 100]`.
    pub fn fader_change(name: &str, value: f64) -> Result<Self, ClientError> {
        let name = non_empty(name, ClientError::InvalidFaderName)?;
        if !(FADER_MIN..=FADER_MAX).contains(&value) {
            return Err(ClientError::InvalidFaderValue);
        }
        Ok(Request::FaderChange { name, value })
    }

    /// Encode to a wire line without the trailing delimiter.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const S: char = SEPARATOR;
        match self {
            Request::Hello { app, password } => write!(f, "HELLO{S}{app}{S}{password}"),
            Request::RequestBpm => f.write_str("BPM"),
            Request::SetBpm(bpm) => write!(f, "BPM{S}{bpm}"),
            Request::Beat => f.write_str("BEAT"),
            Request::FreezeOn => f.write_str("FREEZE_ON"),
            Request::FreezeOff => f.write_str("FREEZE_OFF"),
            Request::AutoBpmOn => f.write_str("AUTO_BPM_ON"),
            Request::AutoBpmOff => f.write_str("AUTO_BPM_OFF"),
            Request::Cue(name) => write!(f, "CUE{S}{name}"),
            Request::ButtonPress(name) => write!(f, "BUTTON_PRESS{S}{name}"),
            Request::ButtonRelease(name) => write!(f, "BUTTON_RELEASE{S}{name}"),
            Request::FaderChange { name, value } => {
                write!(f, "FADER_CHANGE{S}{name}{S}{value}")
            }
            Request::ButtonList => f.write_str("BUTTON_LIST"),
        }
    }
}

fn non_empty(name: &str, err: ClientError) -> Result<String, ClientError> {
    if name.is_empty() {
        Err(err)
    } else {
        Ok(name.to_string())
    }
}
