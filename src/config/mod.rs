// Configuration module entry point
// Loads layered configuration once at startup and exposes the shared state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    BootstrapAsset, BootstrapConfig, BrowserProfile, Config, HealthConfig, HttpConfig,
    LoggingConfig, PerformanceConfig, ProxyConfig, ServerConfig, StaticFilesConfig,
};

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest precedence first: built-in defaults, the optional file,
    /// `RELAY_*` environment variables (`__` separates sections), then `PORT`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let mut builder = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .prefix_separator("_")
                    .separator("__"),
            );

        if let Some(port) = port_override(std::env::var("PORT").ok().as_deref())? {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        builder.build()?.try_deserialize()
    }

    /// Configuration built from defaults only
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

fn with_defaults(builder: Builder) -> Result<Builder, config::ConfigError> {
    let proxy = ProxyConfig::default();
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("proxy.timeout_ms", proxy.timeout_ms)?
        .set_default("proxy.max_bytes", proxy.max_bytes)?
        .set_default("proxy.max_redirects", u64::try_from(proxy.max_redirects).unwrap_or(10))?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 60)?
        .set_default("performance.write_timeout", 60)?
        .set_default("http.server_name", "image-relay")?
        .set_default("http.enable_cors", true)
}

/// Parse the `PORT` environment value; blank means "not set"
fn port_override(raw: Option<&str>) -> Result<Option<u16>, config::ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u16>()
            .map(Some)
            .map_err(|e| config::ConfigError::Message(format!("Invalid PORT '{value}': {e}"))),
    }
}
