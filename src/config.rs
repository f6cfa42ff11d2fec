//! Connection settings.
//!
//! Every field has a default, and deserializing a partial JSON object only
//! overrides the fields it names:
//!
//! ```
//! use tlc_client::Settings;
//!
//! let settings = Settings::from_json_str(r#"{ "ip": "192.168.0.4", "password": "1234" }"#).unwrap();
//!
//! assert_eq!(settings.ip, "192.168.0.4");
//! assert_eq!(settings.port, 7348);
//! assert_eq!(settings.ext_app, "thelightingcontrollerclient");
//! assert_eq!(settings.password, "1234");
//! ```

use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::DEFAULT_PORT;

/// Default controller host.
pub const DEFAULT_IP: &str = "127.0.0.1";

/// Default name this client announces in the handshake.
pub const DEFAULT_EXT_APP: &str = "thelightingcontrollerclient";

/// Default capacity of the outbound line queue.
pub const DEFAULT_WRITE_QUEUE_CAPACITY: usize = 256;

/// Where the controller lives and how to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub ip: String,
    pub port: u16,
    /// Application name sent in `HELLO|{ext_app}|{password}`.
    pub ext_app: String,
    /// Sent in clear text.
    pub password: String,
    pub write_queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ip: DEFAULT_IP.to_string(),
            port: DEFAULT_PORT,
            ext_app: DEFAULT_EXT_APP.to_string(),
            password: String::new(),
            write_queue_capacity: DEFAULT_WRITE_QUEUE_CAPACITY,
        }
    }
}

impl Settings {
    /// Load settings from JSON, keeping defaults for absent fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// `host:port` string for display, with IPv6 literals bracketed.
    pub fn address(&self) -> String {
        match self.ip.parse::<Ipv6Addr>() {
            Ok(_) => format!("[{}]:{}", self.ip, self.port),
            Err(_) => format!("{}:{}", self.ip, self.port),
        }
    }
}
