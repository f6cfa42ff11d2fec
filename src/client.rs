//! Client builder and runtime loop.
//!
//! The [`ClientBuilder`] collects [`Settings`] and connects. The [`Client`]
//! manages the lifecycle:
//! 1. Open the TCP connection
//! 2. Send `HELLO|{ext_app}|{password}`
//! 3. Read chunks, frame them into lines, and publish an [`Event`] per line
//! 4. Publish [`Event::Disconnected`] when the socket closes
//!
//! # Example
//!
//! ```ignore
//! use tlc_client::{Client, Event};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (client, mut events) = Client::builder()
//!         .ip("192.168.0.4")
//!         .password("1234")
//!         .connect()
//!         .await?;
//!
//!     while let Some(event) = events.recv().await {
//!         match event {
//!             Event::Connected => client.button_list().await,
//!             Event::ButtonList(list) => println!("{} pages", list.pages.len()),
//!             Event::Disconnected => break,
//!             other => println!("{:?}", other),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::error::{ClientError, Result};
use crate::event::{ErrorDetail, ErrorEvent, ErrorKind, Event};
use crate::protocol::Request;
use crate::session::Session;
use crate::transport;
use crate::writer::{spawn_writer_task, WriterHandle};

/// Size of the socket read buffer.
const READ_BUFFER_SIZE: usize = 16 * 1024;

/// Receiving end of a client's event stream.
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Builder for configuring and connecting a client.
pub struct ClientBuilder {
    settings: Settings,
}

impl ClientBuilder {
    /// Create a new client builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    /// Replace all settings at once.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Controller host. Default: `127.0.0.1`
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.settings.ip = ip.into();
        self
    }

    /// Controller port. Default: 7348
    pub fn port(mut self, port: u16) -> Self {
        self.settings.port = port;
        self
    }

    /// Application name announced in the handshake.
    pub fn ext_app(mut self, ext_app: impl Into<String>) -> Self {
        self.settings.ext_app = ext_app.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.settings.password = password.into();
        self
    }

    /// Capacity of the outbound line queue. Default: 256
    pub fn write_queue_capacity(mut self, capacity: usize) -> Self {
        self.settings.write_queue_capacity = capacity;
        self
    }

    /// Connect, send the handshake, and start reading.
    pub async fn connect(self) -> Result<(Client, EventReceiver)> {
        Client::connect(&self.settings).await
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected controller client.
///
/// Command methods never fail: invalid arguments and a dead connection are
/// reported on the event stream as [`Event::Error`].
pub struct Client {
    /// Writer handle for sending lines.
    writer: WriterHandle,
    /// Sender side of the event stream, for locally raised errors.
    events: mpsc::UnboundedSender<Event>,
    /// Mirrors the session's connected flag.
    connected: Arc<AtomicBool>,
    read_task: JoinHandle<()>,
    _writer_task: JoinHandle<Result<()>>,
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Open a TCP connection to the controller described by `settings`.
    ///
    /// # Errors
    ///
    /// Fails if the address cannot be resolved or the connection is refused.
    /// Once connected, every failure is reported as an event instead.
    pub async fn connect(settings: &Settings) -> Result<(Self, EventReceiver)> {
        let stream = transport::connect(settings).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self::with_io(reader, writer, settings).await)
    }

    /// Run the protocol over an already-connected byte stream.
    ///
    /// Sends the handshake immediately, before anything is read.
    pub async fn with_io<R, W>(reader: R, writer: W, settings: &Settings) -> (Self, EventReceiver)
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (writer, writer_task) =
            spawn_writer_task(writer, settings.write_queue_capacity, events_tx.clone());
        let connected = Arc::new(AtomicBool::new(false));

        let client = Client {
            writer,
            events: events_tx.clone(),
            connected: connected.clone(),
            read_task: tokio::spawn(Self::read_loop(reader, events_tx, connected)),
            _writer_task: writer_task,
        };

        tracing::debug!(app = %settings.ext_app, "Sending handshake");
        client
            .send(Request::hello(&settings.ext_app, &settings.password))
            .await;

        (client, events_rx)
    }

    /// Main read loop - feeds socket chunks to the session and publishes
    /// the resulting events.
    async fn read_loop<R: AsyncRead + Unpin>(
        mut reader: R,
        events: mpsc::UnboundedSender<Event>,
        connected: Arc<AtomicBool>,
    ) {
        let mut session = Session::new();
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break, // Connection closed
                Ok(n) => n,
                Err(e) => {
                    let _ = events.send(session.on_transport_error(&e));
                    break;
                }
            };

            for event in session.on_bytes_received(&buf[..n]) {
                connected.store(session.is_connected(), Ordering::Release);
                if events.send(event).is_err() {
                    tracing::debug!("Event receiver dropped, stopping read loop");
                    return;
                }
            }
        }

        let event = session.on_close();
        connected.store(false, Ordering::Release);
        tracing::debug!("Connection closed");
        let _ = events.send(event);
    }

    /// Whether the controller has accepted the handshake and the socket is
    /// still open.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Ask the controller for its current BPM (`BPM`).
    pub async fn request_bpm(&self) {
        self.send(Request::RequestBpm).await
    }

    /// Set the manual BPM (`BPM|{bpm}`). Negative or NaN values are rejected.
    pub async fn bpm(&self, bpm: f64) {
        self.send_checked(Request::set_bpm(bpm)).await
    }

    /// One auto-BPM tick (`BEAT`), usually sent between `BEAT_ON` and `BEAT_OFF`.
    pub async fn beat(&self) {
        self.send(Request::Beat).await
    }

    pub async fn freeze(&self) {
        self.send(Request::FreezeOn).await
    }

    pub async fn unfreeze(&self) {
        self.send(Request::FreezeOff).await
    }

    pub async fn auto_bpm_on(&self) {
        self.send(Request::AutoBpmOn).await
    }

    pub async fn auto_bpm_off(&self) {
        self.send(Request::AutoBpmOff).await
    }

    /// Toggle the button named `name` (`CUE|{name}`).
    ///
    /// The controller still reports the resulting press/release as
    /// [`Event::ButtonPress`] / [`Event::ButtonRelease`].
    pub async fn cue(&self, name: &str) {
        self.send_checked(Request::cue(name)).await
    }

    /// Alias of [`Client::cue`].
    pub async fn button_toggle(&self, name: &str) {
        self.cue(name).await
    }

    pub async fn button_press(&self, name: &str) {
        self.send_checked(Request::button_press(name)).await
    }

    pub async fn button_release(&self, name: &str) {
        self.send_checked(Request::button_release(name)).await
    }

    /// Move master fader `name` to `value` in `[-100, 100]`.
    pub async fn fader_change(&self, name: &str, value: f64) {
        self.send_checked(Request::fader_change(name, value)).await
    }

    /// Request the page/button/fader layout; the answer arrives as
    /// [`Event::ButtonList`].
    pub async fn button_list(&self) {
        self.send(Request::ButtonList).await
    }

    async fn send_checked(&self, request: std::result::Result<Request, ClientError>) {
        match request {
            Ok(request) => self.send(request).await,
            Err(e) => {
                tracing::warn!("Rejected outbound command: {}", e);
                self.emit(ErrorEvent::client(e).into());
            }
        }
    }

    async fn send(&self, request: Request) {
        if let Err(e) = self.writer.send(request.encode()).await {
            tracing::warn!("Cannot send {:?}: {}", request, e);
            self.emit(
                ErrorEvent::from_parts(
                    Some(ErrorKind::Socket),
                    Some(ErrorDetail::Socket(e.to_string())),
                )
                .into(),
            );
        }
    }

    fn emit(&self, event: Event) {
        // receiver gone means nobody is listening
        let _ = self.events.send(event);
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.read_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControllerError;
    use tokio::io::{duplex, split, AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
    use tokio::io::{ReadHalf, WriteHalf};
    use tokio::net::TcpListener;

    struct MockController {
        lines: BufReader<ReadHalf<DuplexStream>>,
        writer: WriteHalf<DuplexStream>,
    }

    impl MockController {
        async fn read_line(&mut self) -> String {
            let mut line = String::new();
            self.lines.read_line(&mut line).await.unwrap();
            line
        }

        async fn write(&mut self, data: &str) {
            self.writer.write_all(data.as_bytes()).await.unwrap();
        }
    }

    async fn connected_pair(settings: Settings) -> (Client, EventReceiver, MockController) {
        let (client_io, server_io) = duplex(64 * 1024);
        let (reader, writer) = split(client_io);
        let (client, events) = Client::with_io(reader, writer, &settings).await;

        let (server_read, server_write) = split(server_io);
        let mock = MockController {
            lines: BufReader::new(server_read),
            writer: server_write,
        };
        (client, events, mock)
    }

    #[test]
    fn test_builder_configuration() {
        let builder = Client::builder()
            .ip("123.456.8.9")
            .port(9000)
            .ext_app("myapp")
            .password("6789")
            .write_queue_capacity(8);

        assert_eq!(builder.settings.ip, "123.456.8.9");
        assert_eq!(builder.settings.port, 9000);
        assert_eq!(builder.settings.ext_app, "myapp");
        assert_eq!(builder.settings.password, "6789");
        assert_eq!(builder.settings.write_queue_capacity, 8);
    }

    #[test]
    fn test_builder_default() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.settings, Settings::default());
    }

    #[tokio::test]
    async fn test_handshake_sent_first() {
        let settings = Settings {
            password: "1234".into(),
            ..Default::default()
        };
        let (client, _events, mut mock) = connected_pair(settings).await;

        assert_eq!(
            mock.read_line().await,
            "HELLO|thelightingcontrollerclient|1234\r\n"
        );
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_hello_reply_connects() {
        let (client, mut events, mut mock) = connected_pair(Settings::default()).await;
        mock.read_line().await;

        mock.write("HELLO\r\n").await;

        assert_eq!(events.recv().await, Some(Event::Connected));
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn test_bad_password() {
        let (client, mut events, mut mock) = connected_pair(Settings::default()).await;

        mock.write("ERROR|BAD PASSWORD\r\n").await;

        let Some(Event::Error(err)) = events.recv().await else {
            panic!("expected error event");
        };
        assert_eq!(err.kind, ErrorKind::Server("BAD PASSWORD".into()));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_fragmented_lines() {
        let (_client, mut events, mut mock) = connected_pair(Settings::default()).await;

        mock.write("HEL").await;
        mock.write("LO\r\nFADER_CHANGE|my fa").await;
        mock.write("der|25\r").await;
        mock.write("\nBEAT_ON\r\n").await;

        assert_eq!(events.recv().await, Some(Event::Connected));
        assert_eq!(
            events.recv().await,
            Some(Event::FaderChange {
                name: "my fader".into(),
                value: 25.0
            })
        );
        assert_eq!(events.recv().await, Some(Event::BeatOn));
    }

    #[tokio::test]
    async fn test_failed_write_reports_io_error() {
        let (client_io, _server_io) = duplex(1024);
        let (write_io, peer) = duplex(64);
        drop(peer);

        let (_client, mut events) = Client::with_io(client_io, write_io, &Settings::default()).await;

        let Some(Event::Error(err)) = events.recv().await else {
            panic!("expected error event");
        };
        assert_eq!(err.kind, ErrorKind::Socket);
        match err.detail {
            Some(ErrorDetail::Socket(msg)) => {
                assert_ne!(msg, ControllerError::ConnectionClosed.to_string())
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_close_emits_disconnected() {
        let (client, mut events, mut mock) = connected_pair(Settings::default()).await;
        mock.write("HELLO\r\n").await;
        assert_eq!(events.recv().await, Some(Event::Connected));

        drop(mock);

        assert_eq!(events.recv().await, Some(Event::Disconnected));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_commands_on_the_wire() {
        let (client, _events, mut mock) = connected_pair(Settings::default()).await;
        mock.read_line().await;

        client.request_bpm().await;
        client.bpm(120.0).await;
        client.beat().await;
        client.freeze().await;
        client.unfreeze().await;
        client.auto_bpm_on().await;
        client.auto_bpm_off().await;
        client.cue("lasers").await;
        client.button_toggle("lasers").await;
        client.button_press("my button").await;
        client.button_release("my button").await;
        client.fader_change("0", 0.0).await;
        client.button_list().await;

        let expected = [
            "BPM",
            "BPM|120",
            "BEAT",
            "FREEZE_ON",
            "FREEZE_OFF",
            "AUTO_BPM_ON",
            "AUTO_BPM_OFF",
            "CUE|lasers",
            "CUE|lasers",
            "BUTTON_PRESS|my button",
            "BUTTON_RELEASE|my button",
            "FADER_CHANGE|0|0",
            "BUTTON_LIST",
        ];
        for line in expected {
            assert_eq!(mock.read_line().await, format!("{}\r\n", line));
        }
    }

    #[tokio::test]
    async fn test_invalid_commands_emit_client_errors() {
        let (client, mut events, mut mock) = connected_pair(Settings::default()).await;
        mock.read_line().await;

        client.bpm(-1.0).await;
        client.cue("").await;
        client.button_press("").await;
        client.button_release("").await;
        client.fader_change("", 10.0).await;
        client.fader_change("1", 101.0).await;
        client.fader_change("1", -101.0).await;

        let expected = [
            ClientError::InvalidBpm,
            ClientError::InvalidCueName,
            ClientError::InvalidButtonName,
            ClientError::InvalidButtonName,
            ClientError::InvalidFaderName,
            ClientError::InvalidFaderValue,
            ClientError::InvalidFaderValue,
        ];
        for err in expected {
            assert_eq!(
                events.recv().await,
                Some(Event::Error(ErrorEvent {
                    kind: ErrorKind::Client,
                    detail: Some(ErrorDetail::Client(err)),
                }))
            );
        }

        // nothing invalid reached the wire
        client.fader_change("1", 100.0).await;
        client.fader_change("1", -100.0).await;
        assert_eq!(mock.read_line().await, "FADER_CHANGE|1|100\r\n");
        assert_eq!(mock.read_line().await, "FADER_CHANGE|1|-100\r\n");
    }

    #[tokio::test]
    async fn test_connect_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let (connected, accepted) = tokio::join!(
            Client::builder().port(port).password("pw").connect(),
            listener.accept()
        );
        let (client, mut events) = connected.unwrap();
        let (stream, _) = accepted.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half);

        let mut hello = String::new();
        lines.read_line(&mut hello).await.unwrap();
        assert_eq!(hello, "HELLO|thelightingcontrollerclient|pw\r\n");

        write_half.write_all(b"HELLO\r\n").await.unwrap();
        assert_eq!(events.recv().await, Some(Event::Connected));
        assert!(client.is_connected());

        drop(write_half);
        drop(lines);
        assert_eq!(events.recv().await, Some(Event::Disconnected));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = Client::builder().port(port).connect().await;

        assert!(matches!(result, Err(ControllerError::Io(_))));
    }
}
