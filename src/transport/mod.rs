//! Transport module - TCP connection handling.
//!
//! The rest of the crate only needs an in-order byte stream that can be
//! split into a read half and a write half; [`connect`] provides one over TCP.

mod tcp;

pub use tcp::connect;
