// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::spawn_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop
///
/// `shutdown` yields the name of whatever stopped the server, for the log.
/// In-flight connections are not drained; they end with the runtime.
pub async fn start_server_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = &'static str>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
                        spawn_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            signal = &mut shutdown => {
                logger::log_shutdown(signal);
                return;
            }
        }
    }
}
