//! Mock controller - a stand-in for The Lighting Controller.
//!
//! Accepts any number of clients and answers:
//! - `HELLO|app|password` with `HELLO` (or `ERROR|BAD PASSWORD`)
//! - `BUTTON_LIST` with a canned layout
//! - `BPM` with `BPM|{current}`
//!
//! Every other line is logged.
//!
//! # Running
//!
//! ```text
//! RUST_LOG=info cargo run --example mock_server -- 127.0.0.1:7348 1234
//! ```

use std::sync::Arc;

use tlc_client::protocol::{Line, LineBuffer, CRLF, SEPARATOR};
use tlc_client::ButtonList;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing_subscriber::EnvFilter;

const LAYOUT: &str = include_str!("button_list.xml");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:7348".to_string());
    let password = args.next();

    let layout = ButtonList::from_xml(LAYOUT)?;
    tracing::info!(pages = layout.pages.len(), faders = layout.faders.len(), "Layout loaded");
    let layout: Arc<str> = layout.to_xml()?.into();

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        tracing::info!(%peer, "Client connected");

        let password = password.clone();
        let layout = layout.clone();
        tokio::spawn(async move {
            if let Err(e) = serve(stream, password.as_deref(), &layout).await {
                tracing::warn!(%peer, "Connection failed: {}", e);
            }
            tracing::info!(%peer, "Client disconnected");
        });
    }
}

async fn serve(mut stream: TcpStream, password: Option<&str>, layout: &str) -> std::io::Result<()> {
    let mut buffer = LineBuffer::new();
    let mut chunk = vec![0u8; 4096];
    let mut bpm: f64 = 120.0;

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }

        for raw in buffer.push(&chunk[..n]) {
            let line = Line::parse(&raw);
            let reply = match (line.name(), line.argument(0)) {
                ("HELLO", _) => match (password, line.argument(1)) {
                    (Some(expected), given) if given != Some(expected) => {
                        format!("ERROR{}BAD PASSWORD", SEPARATOR)
                    }
                    _ => "HELLO".to_string(),
                },
                ("BUTTON_LIST", _) => format!("BUTTON_LIST{}{}", SEPARATOR, layout),
                ("BPM", None) => format!("BPM{}{}", SEPARATOR, bpm),
                ("BPM", Some(value)) => {
                    bpm = value.parse().unwrap_or(bpm);
                    tracing::info!(bpm, "Tempo set");
                    continue;
                }
                _ => {
                    tracing::info!(line = %raw, "Received");
                    continue;
                }
            };

            stream.write_all(reply.as_bytes()).await?;
            stream.write_all(CRLF).await?;
        }
    }
}

