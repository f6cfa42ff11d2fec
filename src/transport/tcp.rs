//! TCP connection to the controller.
//!
//! # Example
//!
//! ```ignore
//! use tlc_client::{transport, Settings};
//!
//! let stream = transport::connect(&Settings::default()).await?;
//! let (reader, writer) = stream.into_split();
//! ```

use tokio::net::{lookup_host, TcpStream};

use crate::config::Settings;
use crate::error::{ControllerError, Result};

/// Resolve the configured address and open a TCP stream to it.
///
/// Nagle is disabled: protocol lines are tiny and latency-sensitive
/// (beats, button presses).
pub async fn connect(settings: &Settings) -> Result<TcpStream> {
    let address = settings.address();

    let resolved = lookup_host((settings.ip.as_str(), settings.port))
        .await
        .map_err(|e| ControllerError::InvalidAddress(format!("{}: {}", address, e)))?
        .next()
        .ok_or_else(|| ControllerError::InvalidAddress(address))?;

    let stream = TcpStream::connect(resolved).await?;
    stream.set_nodelay(true)?;

    tracing::debug!(%resolved, "Connected to controller");
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn local_settings(port: u16) -> Settings {
        Settings {
            ip: "127.0.0.1".into(),
            port,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_connect_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let settings = local_settings(port);
        let (client, accepted) = tokio::join!(connect(&settings), listener.accept());

        let stream = client.unwrap();
        let (_server, peer) = accepted.unwrap();
        assert_eq!(stream.local_addr().unwrap(), peer);
        assert!(stream.nodelay().unwrap());
    }

    #[tokio::test]
    async fn test_connect_ipv6_literal() {
        let Ok(listener) = TcpListener::bind("[::1]:0").await else {
            // host without IPv6 loopback
            return;
        };
        let port = listener.local_addr().unwrap().port();
        let settings = Settings {
            ip: "::1".into(),
            port,
            ..Default::default()
        };

        let (client, accepted) = tokio::join!(connect(&settings), listener.accept());

        assert!(client.unwrap().peer_addr().unwrap().is_ipv6());
        accepted.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_io_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = connect(&local_settings(port)).await;

        assert!(matches!(result, Err(ControllerError::Io(_))));
    }
}
