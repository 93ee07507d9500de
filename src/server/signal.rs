// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM stop the server. Other platforms only get
// Ctrl+C.

use crate::logger;

/// Resolve when a shutdown signal arrives, yielding its name
#[cfg(unix)]
pub async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            ctrl_c().await;
            return "SIGINT";
        }
    };

    tokio::select! {
        () = ctrl_c() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() -> &'static str {
    ctrl_c().await;
    "Ctrl+C"
}

/// Wait for Ctrl+C; if the handler cannot be installed, wait forever
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
