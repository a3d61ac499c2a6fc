//! Layered application configuration.

use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub loader: LoaderConfig,
    pub telemetry: TelemetryConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub enable_cors: bool,
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoaderConfig {
    /// Abort start-up when any tool module fails to load.
    pub strict: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TelemetryConfig {
    pub json_logs: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    /// OpenAI-compatible endpoint base.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<Secret<String>>,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration, layering `config/default`, the
    /// `TOOLSPAN_ENV`-specific file, `config/local`, and
    /// `TOOLSPAN__`-prefixed environment variables
    /// (`TOOLSPAN__SERVER__PORT=8080` maps to `server.port`).
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("TOOLSPAN_ENV").unwrap_or_else(|_| "development".into());

        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("TOOLSPAN").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_serviceable_without_files() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert!(config.gateway.enable_cors);
        assert!(!config.loader.strict);
        assert!(config.model.api_key.is_none());
    }
}
