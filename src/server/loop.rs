// Server loop module
// Accepts connections until a shutdown signal, then drains open connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::shutdown_signal;
use crate::config;
use crate::logger;

/// How long open connections get to finish after shutdown is requested
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main server loop
///
/// Must run inside a `LocalSet`; connections are spawned with `spawn_local`.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            signal = &mut shutdown => {
                logger::log_shutdown_requested(signal);
                break;
            }
        }
    }

    // Stop accepting before waiting on in-flight requests
    drop(listener);
    let remaining = drain_connections(&active_connections, DRAIN_TIMEOUT).await;
    logger::log_shutdown_complete(remaining);
    Ok(())
}

/// Wait for the counter to reach zero or the timeout to pass
///
/// Returns the number of connections still open.
async fn drain_connections(active: &AtomicUsize, timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let open = active.load(Ordering::SeqCst);
        if open == 0 || tokio::time::Instant::now() >= deadline {
            return open;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let active = AtomicUsize::new(0);
        assert_eq!(drain_connections(&active, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_timeout() {
        let active = AtomicUsize::new(2);
        assert_eq!(drain_connections(&active, Duration::from_millis(200)).await, 2);
    }
}
