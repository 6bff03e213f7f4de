//! Settings for the application, read from an optional `settings.toml` in
//! the working directory and overridden by `FAMILY_BUDGET__*` environment
//! variables (e.g. `FAMILY_BUDGET__SERVER__PORT=8080`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Tracing level for the workspace crates.
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    /// Path of the SQLite file, created when missing.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: Database,
    /// Base of the `url` field of item representations.
    pub public_url: Option<String>,
}

impl Server {
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.bind, self.port))
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(
                    Environment::with_prefix("FAMILY_BUDGET")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Settings::from_config(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn empty_settings_run_nothing() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert!(settings.server.is_none());
    }

    #[test]
    fn server_defaults() {
        let settings = parse(
            r#"
            [server]
            database = "memory"
            "#,
        );
        let server = settings.server.unwrap();
        assert_eq!(server.bind, "127.0.0.1");
        assert_eq!(server.port, 3000);
        assert_eq!(server.database, Database::Memory);
        assert_eq!(server.public_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn sqlite_database_and_public_url() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            port = 8080
            public_url = "https://budget.example.com"
            database = { sqlite = "budget.db" }
            "#,
        );
        let server = settings.server.unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(server.database, Database::Sqlite("budget.db".to_string()));
        assert_eq!(server.public_url(), "https://budget.example.com");
    }
}
