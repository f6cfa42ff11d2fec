//! Dedicated writer task for outbound lines.
//!
//! Command methods never touch the socket. They hand an in-memory line to
//! the writer task over an mpsc channel; the task appends `CRLF` and writes.
//! Lines queued while a write is in flight go out together in one write.
//! A failed write is published as a `SOCKET` error event before the task
//! stops.
//!
//! # Architecture
//!
//! ```text
//! Client::cue ─────┐
//! Client::beat ────┼─► mpsc::Sender<String> ─► Writer Task ─► TCP write half
//! handshake ───────┘
//! ```

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{ControllerError, Result};
use crate::event::{ErrorEvent, Event};
use crate::protocol::CRLF;

/// Maximum lines to batch in a single write operation.
const MAX_BATCH_SIZE: usize = 64;

/// Handle for sending lines to the writer task.
///
/// Cheaply cloneable.
#[derive(Clone)]
pub struct WriterHandle {
    tx: mpsc::Sender<String>,
}

impl WriterHandle {
    /// Queue a line (without delimiter) for writing.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::ConnectionClosed`] if the writer task has
    /// stopped.
    pub async fn send(&self, line: String) -> Result<()> {
        self.tx
            .send(line)
            .await
            .map_err(|_| ControllerError::ConnectionClosed)
    }
}

/// Spawn the writer task and return a handle for sending lines.
///
/// The task ends cleanly once every handle is dropped. When a write fails
/// it sends [`ErrorEvent::socket`] on `events` and ends with the error.
pub fn spawn_writer_task<W>(
    writer: W,
    capacity: usize,
    events: mpsc::UnboundedSender<Event>,
) -> (WriterHandle, JoinHandle<Result<()>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(writer_loop(rx, writer, events));
    (WriterHandle { tx }, task)
}

/// Main writer loop - receives lines and writes them to the socket.
async fn writer_loop<W>(
    mut rx: mpsc::Receiver<String>,
    mut writer: W,
    events: mpsc::UnboundedSender<Event>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut batch = Vec::with_capacity(MAX_BATCH_SIZE);

    loop {
        // Wait for first line
        let Some(first) = rx.recv().await else {
            // Channel closed, clean shutdown
            return Ok(());
        };
        batch.push(first);

        // Collect additional ready lines (non-blocking)
        while batch.len() < MAX_BATCH_SIZE {
            match rx.try_recv() {
                Ok(line) => batch.push(line),
                Err(_) => break,
            }
        }

        if let Err(e) = write_batch(&mut writer, &batch).await {
            tracing::error!("Failed to write to controller: {}", e);
            let _ = events.send(ErrorEvent::socket(&e).into());
            return Err(e.into());
        }
        batch.clear();
    }
}

/// Write a batch of lines, each followed by `CRLF`, then flush.
async fn write_batch<W>(writer: &mut W, batch: &[String]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let size: usize = batch.iter().map(|line| line.len() + CRLF.len()).sum();
    let mut buf = BytesMut::with_capacity(size);

    for line in batch {
        tracing::debug!(line = %line, "Sending");
        buf.extend_from_slice(line.as_bytes());
        buf.extend_from_slice(CRLF);
    }

    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}
