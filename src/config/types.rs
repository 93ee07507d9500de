// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub key: KeyConfig,
}

/// Listener and serving root configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as the document root
    pub root: String,
    /// Scan upward from `port` for the first free port
    #[serde(default)]
    pub auto_port: bool,
    #[serde(default = "default_port_search_attempts")]
    pub port_search_attempts: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_port_search_attempts() -> u16 {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            root: ".".to_string(),
            auto_port: false,
            port_search_attempts: default_port_search_attempts(),
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Skip access lines for successful GETs, keeping errors and other methods
    #[serde(default)]
    pub access_log_errors_only: bool,
    /// Access log format (common, combined or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_errors_only: false,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// HTTP behaviour configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    #[serde(default = "default_directory_listing")]
    pub directory_listing: bool,
    /// Send `Cache-Control: no-cache, no-store, must-revalidate` on every response
    #[serde(default)]
    pub no_cache: bool,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_directory_listing() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: concat!("devserve/", env!("CARGO_PKG_VERSION")).to_string(),
            index_files: default_index_files(),
            directory_listing: default_directory_listing(),
            no_cache: false,
        }
    }
}

/// Where the encryption key comes from and where it is served
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KeyConfig {
    /// Environment variable checked first
    pub env_var: String,
    /// Local JSON file checked when the variable is unset or empty
    pub config_file: String,
    /// Field read from the JSON file
    pub field: String,
    /// Request path answered with the key
    pub endpoint: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            env_var: "VITE_ENCRYPTION_KEY".to_string(),
            config_file: "local_config.json".to_string(),
            field: "VITE_ENCRYPTION_KEY".to_string(),
            endpoint: "/api/encryption-key".to_string(),
        }
    }
}
