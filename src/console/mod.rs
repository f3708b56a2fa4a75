//! Line-oriented TCP console
//!
//! Each connection is greeted with `welcome` and then gets one reply per
//! input line. See [`Command`] for the recognised input.

mod commands;

pub use commands::{execute, Command};

use crate::crawler::PipelineHandle;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Accepts console connections until `shutdown` is cancelled
///
/// Returns once every open connection has closed.
pub async fn serve(listener: TcpListener, handle: PipelineHandle, shutdown: CancellationToken) {
    let connections = TaskTracker::new();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::debug!("console connection from {}", peer);
                    connections.spawn(handle_connection(stream, handle.clone(), shutdown.clone()));
                }
                Err(e) => tracing::warn!("console accept failed: {}", e),
            },
        }
    }

    connections.close();
    connections.wait().await;
    tracing::info!("console stopped");
}

async fn handle_connection(stream: TcpStream, handle: PipelineHandle, shutdown: CancellationToken) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    if let Err(e) = writer.write_all(b"welcome\n").await {
        tracing::debug!("console client left before greeting: {}", e);
        return;
    }

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            next = lines.next_line() => match next {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("console read failed: {}", e);
                    break;
                }
            },
        };

        let mut reply = execute(Command::parse(&line), &handle).await;
        reply.push('\n');

        if let Err(e) = writer.write_all(reply.as_bytes()).await {
            tracing::debug!("console write failed: {}", e);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::{idle_handle, StubFetcher};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_console_session() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = idle_handle(Arc::new(StubFetcher::default()), 5);
        let shutdown = CancellationToken::new();
        let server = tokio::spawn(serve(listener, handle.clone(), shutdown.clone()));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        assert_eq!(lines.next_line().await.unwrap().unwrap(), "welcome");

        writer.write_all(b"/ping\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "pong");

        writer.write_all(b"1BC123\r\n").await.unwrap();
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "queued farm id 1BC123"
        );
        assert_eq!(handle.queue.len(), 1);

        writer.write_all(b"\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "/help for help");

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("console should stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_client_disconnect_is_harmless() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = idle_handle(Arc::new(StubFetcher::default()), 5);
        let shutdown = CancellationToken::new();
        let server = tokio::spawn(serve(listener, handle, shutdown.clone()));

        drop(TcpStream::connect(addr).await.unwrap());

        let stream = TcpStream::connect(addr).await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "welcome");

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("console should stop")
            .unwrap();
    }
}
