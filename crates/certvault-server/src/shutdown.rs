//! Graceful shutdown trigger.

use std::future::Future;
use std::io;

use tracing::{info, warn};

/// Resolves once `signal` fires.
///
/// If the signal listener itself fails the server keeps running: the
/// returned future never completes rather than shutting down on the error.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
