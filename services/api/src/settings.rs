//! Service settings
//!
//! Defaults first, then an optional `config.toml`, then environment
//! variables. `SERVER_PORT=8080` overrides `server.port`.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Receipts {
    /// Seconds between recording a donation and flipping its local
    /// receipt flag
    pub delay_seconds: u64,
}

impl Default for Receipts {
    fn default() -> Self {
        Self { delay_seconds: 3 }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    pub server: Server,
    pub receipts: Receipts,
}

impl Settings {
    pub(crate) fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("receipts.delay_seconds", 3)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        unsafe {
            std::env::remove_var("SERVER_HOST");
            std::env::remove_var("SERVER_PORT");
            std::env::remove_var("RECEIPTS_DELAY_SECONDS");
        }

        let settings = Settings::new().unwrap_or_default();
        assert_eq!(settings.server.bind_address(), "0.0.0.0:3001");
        assert_eq!(settings.receipts.delay_seconds, 3);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        unsafe {
            std::env::set_var("SERVER_PORT", "8080");
        }

        let settings = Settings::new().unwrap_or_default();
        assert_eq!(settings.server.port, 8080);

        unsafe {
            std::env::remove_var("SERVER_PORT");
        }
    }
}
