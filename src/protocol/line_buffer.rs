//! Line buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` as the single owned receive buffer. Every push
//! drains all complete `CRLF`-terminated lines, so between pushes the buffer
//! only ever holds the trailing partial line.
//!
//! Lines are decoded as UTF-8 only once complete, which keeps multi-byte
//! characters that straddle two socket reads intact.
//!
//! # Example
//!
//! ```
//! use tlc_client::protocol::LineBuffer;
//!
//! let mut buffer = LineBuffer::new();
//!
//! assert!(buffer.push(b"BEAT_").is_empty());
//! let lines = buffer.push(b"ON\r\nBPM|120\r\nHEL");
//!
//! assert_eq!(lines, vec!["BEAT_ON".to_string(), "BPM|120".to_string()]);
//! assert_eq!(buffer.remaining(), b"HEL");
//! ```

use bytes::BytesMut;

use super::CRLF;

/// Default initial capacity of the receive buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Buffer for accumulating incoming bytes and extracting complete lines.
pub struct LineBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Offset up to which the buffer is known not to contain a delimiter.
    scanned: usize,
}

impl LineBuffer {
    /// Create a new line buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a new line buffer with a custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            scanned: 0,
        }
    }

    /// Push data into the buffer and extract all complete lines.
    ///
    /// Returns the lines in arrival order, without their delimiter. Partial
    /// data is kept for the next push.
    pub fn push(&mut self, data: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(data);

        let mut lines = Vec::new();
        while let Some(line) = self.try_extract_one() {
            lines.push(line);
        }
        lines
    }

    /// Try to extract a single line from the front of the buffer.
    fn try_extract_one(&mut self) -> Option<String> {
        let Some(end) = self.find_delimiter() else {
            // A trailing '\r' may be the first half of a split delimiter.
            self.scanned = self.buffer.len().saturating_sub(CRLF.len() - 1);
            return None;
        };

        let line = self.buffer.split_to(end);
        let _ = self.buffer.split_to(CRLF.len());
        self.scanned = 0;

        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Offset of the first delimiter at or after the scanned mark.
    fn find_delimiter(&self) -> Option<usize> {
        self.buffer[self.scanned..]
            .windows(CRLF.len())
            .position(|window| window == CRLF)
            .map(|pos| self.scanned + pos)
    }

    /// Bytes still waiting for a delimiter.
    pub fn remaining(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard any buffered partial line.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scanned = 0;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
