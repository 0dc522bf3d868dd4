use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use common::logging;

/// All configuration is read from `SOCIAL_`-prefixed environment variables,
/// falling back to the defaults below.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Name of this instance
    pub name: String,

    /// The logging config
    pub logging: LoggingConfig,

    /// API config
    pub api: ApiConfig,

    /// Database config
    pub database: DatabaseConfig,

    /// JWT config
    pub jwt: JwtConfig,

    /// Upload config
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// The log level to use, this is a tracing env filter
    pub level: String,

    /// What logging mode we should use
    pub mode: logging::Mode,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            mode: logging::Mode::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Bind address for the API
    pub bind_address: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "[::]:4000".parse().expect("failed to parse bind address"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// The database URL to use
    pub uri: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://root@localhost:5432/social_dev".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JwtConfig {
    /// JWT secret
    pub secret: String,

    /// JWT issuer
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: "social".to_string(),
            secret: "social".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadConfig {
    /// Directory uploaded files are written to
    pub root: PathBuf,

    /// Maximum accepted image size in bytes
    pub max_image_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("uploads"),
            max_image_size: 5 * 1024 * 1024,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "social-api".to_string(),
            logging: LoggingConfig::default(),
            api: ApiConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            uploads: UploadConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn parse() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            name: var_or("SOCIAL_NAME", defaults.name)?,
            logging: LoggingConfig {
                level: var_or("SOCIAL_LOG_LEVEL", defaults.logging.level)?,
                mode: var_or("SOCIAL_LOG_MODE", defaults.logging.mode)?,
            },
            api: ApiConfig {
                bind_address: var_or("SOCIAL_BIND_ADDRESS", defaults.api.bind_address)?,
            },
            database: DatabaseConfig {
                uri: var_or("SOCIAL_DATABASE_URI", defaults.database.uri)?,
            },
            jwt: JwtConfig {
                secret: var_or("SOCIAL_JWT_SECRET", defaults.jwt.secret)?,
                issuer: var_or("SOCIAL_JWT_ISSUER", defaults.jwt.issuer)?,
            },
            uploads: UploadConfig {
                root: var_or("SOCIAL_UPLOAD_ROOT", defaults.uploads.root)?,
                max_image_size: var_or("SOCIAL_UPLOAD_MAX_IMAGE_SIZE", defaults.uploads.max_image_size)?,
            },
        })
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|err| anyhow!("invalid {key} value {raw:?}: {err}")),
        Err(_) => Ok(default),
    }
}
