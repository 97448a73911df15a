//! Handles settings for the application.
//!
//! Values are read from an optional `settings.toml` in the working directory
//! and can be overridden with `EXPENSE_TRACKER__<SECTION>__<KEY>` environment
//! variables.
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("EXPENSE_TRACKER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.level", "info")?
        .set_default("server.port", 3000)?
        .set_default("server.database", "memory")
}
