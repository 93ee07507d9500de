//! Request handler module
//!
//! Dispatch for preflight, the encryption key endpoint and static files.

pub mod encryption_key;
pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
