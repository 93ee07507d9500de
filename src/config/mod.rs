// Configuration module entry point
// Loads server settings and resolves the encryption key at startup

pub mod key;
mod state;
mod types;

pub use key::{KeySource, ResolvedKey};
pub use state::AppState;
pub use types::{Config, HttpConfig, KeyConfig, LoggingConfig, ServerConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "devserve";

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "DEVSERVE_CONFIG";

impl Config {
    /// Load configuration from the path in `DEVSERVE_CONFIG`, or `devserve.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    ///
    /// Built-in defaults are layered under the file, and `DEVSERVE__SECTION__KEY`
    /// environment variables over it.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
