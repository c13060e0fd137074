use std::sync::Arc;

use tokio::signal;
use tracing::info;
use walkin_core::EventBroadcaster;

#[allow(
    clippy::expect_used,
    reason = "Signal handlers are critical infrastructure, panic is appropriate on failure"
)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("🛑 Received Ctrl+C, initiating graceful shutdown..."),
        () = terminate => info!("🛑 Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// Wait for a shutdown signal, then close the broadcaster so open realtime
/// sessions end and the server can drain.
pub async fn shutdown_and_close(events: Arc<EventBroadcaster>) {
    shutdown_signal().await;
    events.close();
    info!("⏳ Realtime channel closed, draining in-flight requests...");
}
