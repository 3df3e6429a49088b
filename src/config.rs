//! Configuration layer: typed settings with layered precedence (defaults → file → env).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

const LOCAL_CONFIG_BASENAME: &str = "newsroom";
const ENV_PREFIX: &str = "NEWSROOM";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "news";
const DEFAULT_BLOGS_COLLECTION: &str = "news-blogs";
const DEFAULT_EXTRAS_COLLECTION: &str = "news-extras";
const DEFAULT_LOG_FILTER: &str = "newsroom=info,tower_http=info";

/// Command-line arguments for the newsroom binary.
#[derive(Debug, Parser)]
#[command(name = "newsroom", version, about = "News blog catalog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "NEWSROOM_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP API (default).
    Serve,
    /// Sign a bearer token with the configured secret.
    #[command(name = "issue-token")]
    IssueToken {
        /// Subject (user id) embedded in the token.
        #[arg(long)]
        subject: String,
        /// Grant the manager role.
        #[arg(long)]
        manager: bool,
        /// Token lifetime in hours.
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which document store backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub mongodb: MongoSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Path prefix the API is mounted under; empty for the root.
    #[serde(default)]
    pub base_path: String,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub blogs_collection: String,
    pub extras_collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret for bearer tokens.
    #[serde(default)]
    pub jwt_secret: String,
    /// Expected `iss` claim, if any.
    #[serde(default)]
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub filter: String,
}

impl Settings {
    /// Load settings from defaults, an optional file, and `NEWSROOM_*` env vars.
    ///
    /// Without an explicit path, `newsroom.toml` in the working directory is
    /// read if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(LOCAL_CONFIG_BASENAME).required(false),
        };

        let config = defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Load settings from TOML text layered over the defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "auth.jwt_secret must be set (NEWSROOM_AUTH__JWT_SECRET)".into(),
            ));
        }
        let base_path = &self.server.base_path;
        if !base_path.is_empty() && !base_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server.base_path must start with '/', got '{base_path}'"
            )));
        }
        if self.store.backend == StoreBackend::Mongo && self.mongodb.uri.is_empty() {
            return Err(ConfigError::Invalid("mongodb.uri must be set".into()));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("server.host", DEFAULT_HOST)?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("server.base_path", "")?
        .set_default("store.backend", "mongo")?
        .set_default("mongodb.uri", DEFAULT_MONGODB_URI)?
        .set_default("mongodb.database", DEFAULT_DATABASE)?
        .set_default("mongodb.blogs_collection", DEFAULT_BLOGS_COLLECTION)?
        .set_default("mongodb.extras_collection", DEFAULT_EXTRAS_COLLECTION)?
        .set_default("auth.jwt_secret", "")?
        .set_default("log.filter", DEFAULT_LOG_FILTER)?)
}
