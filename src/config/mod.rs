// Configuration module entry point
// Layered configuration: defaults, optional config file, environment

mod state;
mod types;

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::ConfigBuilder;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LogFormat, LoggingConfig, PerformanceConfig, ServerConfig,
    StorageBackend, StorageConfig,
};

/// Environment variable that overrides `server.port`
const PORT_ENV: &str = "PORT";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest precedence first: built-in defaults, the config file
    /// (optional), `QUOTES_*` environment variables (`__` separates nested
    /// keys, e.g. `QUOTES_STORAGE__PATH`), and finally `PORT`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::build(config_path, std::env::var(PORT_ENV).ok())
    }

    fn build(config_path: &str, port: Option<String>) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("QUOTES")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port)?
            .build()?;

        settings.try_deserialize()
    }

    /// Built-in defaults only
    #[cfg(test)]
    pub fn defaults() -> Result<Self, config::ConfigError> {
        with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.backlog", 128)?
        .set_default("storage.backend", "file")?
        .set_default("storage.path", "data/quotes.json")?
        .set_default("logging.access_log", true)?
        .set_default("logging.format", "simple")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "quotes-server")?
        .set_default("http.enable_cors", true)?
        .set_default("http.max_body_size", 102_400)? // 100KB
        .set_default("http.static_dir", "public")
}
