// Application state module
// Immutable state shared by every connection

use super::key::{KeySource, ResolvedKey};
use super::types::Config;

/// Application state
///
/// Built once at startup and shared behind an `Arc`. Nothing in here changes
/// while the server runs, so handlers read it without locking.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub encryption_key: Option<String>,
    pub key_source: KeySource,
}

impl AppState {
    pub fn new(config: Config, key: ResolvedKey) -> Self {
        Self {
            config,
            encryption_key: key.value,
            key_source: key.source,
        }
    }
}
