//! Service configuration
//!
//! Sources, lowest precedence first: YAML file, `HELI_*` environment
//! variables, command line flags.

use heli_classifier::{ClassifierConfig, LaunchMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::cli::Cli;

/// Environment variable that selects the development launch flavor when set
pub const DEV_ENV_VAR: &str = "FLASK_ENV";

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Classifier process settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from file, environment, and CLI overrides
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = Self::from_sources(&cli.config)?;

        if std::env::var(DEV_ENV_VAR).is_ok_and(|v| !v.is_empty()) {
            info!("{} is set, using development launch", DEV_ENV_VAR);
            config.classifier.launch = LaunchMode::Development;
        }

        config.apply_cli(cli);
        config.classifier.validate()?;
        Ok(config)
    }

    /// Read the YAML file (if present) and `HELI_*` environment overrides.
    ///
    /// Nested keys use a double underscore: `HELI_CLASSIFIER__BEST_LANGS=5`.
    pub fn from_sources(config_path: &str) -> anyhow::Result<Self> {
        if Path::new(config_path).exists() {
            info!("Loading configuration from {}", config_path);
        }

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("HELI")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("classifier.languages")
                    .with_list_parse_key("classifier.jvm_args")
                    .with_list_parse_key("classifier.command"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(listen) = &cli.listen {
            self.server.listen = listen.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(jar) = &cli.jar {
            self.classifier.jar = jar.clone();
        }
        if let Some(best_langs) = cli.best_langs {
            self.classifier.best_langs = best_langs;
        }
        if let Some(languages) = &cli.languages {
            self.classifier.languages = languages
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect();
        }
        if cli.dev {
            self.classifier.launch = LaunchMode::Development;
        }
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.listen, self.server.port)
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}
