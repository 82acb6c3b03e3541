//! Application settings loaded from a TOML file plus environment overrides.
//!
//! The config file defaults to `larder.toml` in the working directory and can
//! be pointed elsewhere with `LARDER_CONFIG`. Every value can also be set via
//! `LARDER__`-prefixed environment variables (e.g. `LARDER__SERVER__PORT`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for the env filter (error, warn, info, debug, trace).
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Database {
    /// In-memory SQLite; state is lost on shutdown. Useful for demos/tests.
    Memory,
    /// File-backed SQLite, created on first run.
    Sqlite { path: String },
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var("LARDER_CONFIG").unwrap_or_else(|_| "larder.toml".to_string());

        Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("LARDER").separator("__"))
            .build()?
            .try_deserialize()
    }
}
