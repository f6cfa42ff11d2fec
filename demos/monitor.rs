//! Monitor - connect to a controller and print everything it sends.
//!
//! This example demonstrates:
//! - Configuring a client with `ClientBuilder`
//! - Requesting the button list once the handshake is accepted
//! - Answering the controller's BPM query
//!
//! # Running
//!
//! ```text
//! cargo run --example mock_server &
//! RUST_LOG=tlc_client=debug cargo run --example monitor -- 127.0.0.1 1234
//! ```

use tlc_client::{Client, Event};
use tracing_subscriber::EnvFilter;

/// BPM reported when the controller asks for ours.
const LOCAL_BPM: f64 = 120.0;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let ip = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let password = args.next().unwrap_or_default();

    let (client, mut events) = Client::builder()
        .ip(ip)
        .password(password)
        .connect()
        .await?;

    while let Some(event) = events.recv().await {
        match event {
            Event::Connected => {
                println!("connected");
                client.button_list().await;
            }
            Event::ButtonList(list) => {
                println!("{}", serde_json::to_string_pretty(&list)?);
            }
            Event::Bpm { value: None } => {
                println!("controller asked for bpm");
                client.bpm(LOCAL_BPM).await;
            }
            Event::Error(err) => eprintln!("error: {}", err),
            Event::Disconnected => {
                println!("disconnected");
                break;
            }
            other => println!("{:?}", other),
        }
    }

    Ok(())
}
