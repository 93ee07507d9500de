// Connection handling module
// Serves one accepted TCP connection on its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve a connection in a spawned task with HTTP/1.1 keep-alive.
///
/// There are no read or write timeouts; the task ends when the client closes
/// the connection.
pub fn spawn_connection(stream: TcpStream, remote_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&state), remote_addr)
        });

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            logger::log_connection_error(&err);
        }
    });
}
