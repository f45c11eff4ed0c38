// Server loop module
// Accepts connections until shutdown, then drains the ones in flight

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// How long in-flight connections get to finish after shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` resolves
///
/// After shutdown the listener is closed and the loop waits up to
/// `DRAIN_TIMEOUT` for active connections to finish.
pub async fn run_server_loop<S>(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: S,
) where
    S: Future<Output = ()>,
{
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

            () = &mut shutdown => {
                logger::log_info("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);
    drain_connections(&active_connections).await;
}

async fn drain_connections(active_connections: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            logger::log_info("All connections closed");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Drain timeout reached with {remaining} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_drain_returns_when_idle() {
        let counter = AtomicUsize::new(0);
        drain_connections(&counter).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_gives_up_after_timeout() {
        let counter = AtomicUsize::new(2);
        let started = tokio::time::Instant::now();
        drain_connections(&counter).await;
        assert!(started.elapsed() >= DRAIN_TIMEOUT);
    }
}
