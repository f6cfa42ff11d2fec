//! # tlc-client
//!
//! Rust client for the TCP line protocol of The Lighting Controller.
//!
//! The controller listens on port 7348 and talks in `CRLF`-terminated
//! lines of `|`-separated fields. This crate logs in, frames the inbound
//! stream into typed [`Event`]s, and builds validated outbound commands.
//!
//! ## Architecture
//!
//! - **Session**: pure state machine from byte chunks to events
//! - **Read loop**: feeds socket reads to the session, publishes events
//! - **Writer task**: serializes outbound lines onto the socket
//!
//! ## Example
//!
//! ```ignore
//! use tlc_client::{ClientBuilder, Event};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (client, mut events) = ClientBuilder::new()
//!         .ip("192.168.0.4")
//!         .password("1234")
//!         .connect()
//!         .await
//!         .unwrap();
//!
//!     while let Some(event) = events.recv().await {
//!         if event == Event::Connected {
//!             client.fader_change("Master fader 3", 50.0).await;
//!         }
//!     }
//! }
//! ```

pub mod button_list;
pub mod config;
pub mod error;
pub mod event;
pub mod protocol;
pub mod transport;

mod client;
mod session;
mod writer;

pub use button_list::ButtonList;
pub use client::{Client, ClientBuilder, EventReceiver};
pub use config::Settings;
pub use error::{ClientError, ControllerError};
pub use event::{ErrorDetail, ErrorEvent, ErrorKind, Event};
pub use session::Session;
