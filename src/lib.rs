//! devserve
//!
//! Local development HTTP server: static files from a working directory,
//! cross-origin isolation headers on every response, and an encryption key
//! exposed at `/api/encryption-key`.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
