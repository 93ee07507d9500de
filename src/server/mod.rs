// Server module entry point
// Listener binding, connection handling and shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::{bind, create_listener};
pub use server_loop::start_server_loop;
pub use signal::shutdown_signal;
