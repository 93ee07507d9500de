//! Logger module
//!
//! Server lifecycle, warning/error and access logging. Before `init` is
//! called, lines go straight to stdout/stderr.

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::{AppState, LoggingConfig};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let level = config.level.parse::<Level>().unwrap_or_else(|e| {
        eprintln!("[WARN] {e}, using info");
        Level::Info
    });
    writer::init(
        level,
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None => match level {
            Level::Error | Level::Warn => eprintln!("{message}"),
            Level::Info | Level::Debug => println!("{message}"),
        },
    }
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let config = &state.config;
    write(
        Level::Info,
        &format!("Serving HTTP with CORS at http://{addr}/ (Press CTRL+C to quit)"),
    );
    write(Level::Info, &format!("Serving files from: {}", config.server.root));
    write(
        Level::Info,
        &format!(
            "Encryption key endpoint: {} ({})",
            config.key.endpoint, state.key_source
        ),
    );
    if let Some(workers) = config.server.workers {
        write(Level::Debug, &format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Debug, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Debug, &format!("Error log: {path}"));
    }
}

pub fn log_port_in_use(port: u16) {
    write(Level::Debug, &format!("Port {port} in use, trying next"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write(Level::Debug, &format!("[Connection] {err}"));
}

pub fn log_shutdown(signal: &str) {
    write(Level::Info, &format!("\n{signal} received, server stopped"));
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
