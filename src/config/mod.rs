pub mod cli;
pub mod env;
pub mod toml_config;

pub use cli::CliConfig;
pub use env::EnvSettings;
pub use toml_config::FileConfig;

use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{
    parse_port, validate_non_empty_string, validate_path, validate_range,
    validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_READY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Everything the relay needs, validated once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub sftp: SftpConfig,
    pub documents: DocumentConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| RelayError::InvalidConfigValueError {
                field: "server.bind_address".to_string(),
                value: self.bind_address.clone(),
                reason: format!("{}", e),
            })
    }
}

#[derive(Clone)]
pub struct SftpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub ready_timeout: Duration,
}

impl std::fmt::Debug for SftpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("ready_timeout", &self.ready_timeout)
            .finish()
    }
}

/// Local files written on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    pub output_dir: String,
    pub french_file: String,
    pub english_file: String,
    pub log_file: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            french_file: "data_calendrier.html".to_string(),
            english_file: "data_calendar.html".to_string(),
            log_file: "app.log".to_string(),
        }
    }
}

impl DocumentConfig {
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir).join(&self.log_file)
    }
}

/// Remote paths touched on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub french_calendar: String,
    pub english_calendar: String,
    /// Re-uploaded unchanged so the host bumps their modification time.
    pub refresh_targets: Vec<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            french_calendar: "/martinmessier/Private/Data/data_calendrier.html".to_string(),
            english_calendar: "/martinmessier/Private/Data/data_calendar.html".to_string(),
            refresh_targets: vec![
                "/martinmessier/calendrier-martin-messier.html".to_string(),
                "/martinmessier/artist-martin-messier-calendar.html".to_string(),
            ],
        }
    }
}

impl RelayConfig {
    /// Reads the environment and, when given, the `--config` file.
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Self::from_parts(EnvSettings::from_env(), file)
    }

    pub fn from_parts(env: EnvSettings, file: FileConfig) -> Result<Self> {
        let host = validate_required_field("SFTP_HOST", &env.sftp_host)?.clone();
        let username = validate_required_field("SFTP_USERNAME", &env.sftp_username)?.clone();
        let password = validate_required_field("SFTP_PASSWORD", &env.sftp_password)?.clone();

        let config = Self {
            server: ServerConfig {
                bind_address: file
                    .server
                    .bind_address
                    .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
                port: parse_port("PORT", &env.listen_port)?,
            },
            sftp: SftpConfig {
                host,
                port: parse_port("SFTP_PORT", &env.sftp_port)?,
                username,
                password,
                ready_timeout: Duration::from_secs(
                    file.sftp
                        .ready_timeout_seconds
                        .unwrap_or(DEFAULT_READY_TIMEOUT_SECS),
                ),
            },
            documents: file.documents,
            remote: file.remote,
        };

        config.validate()?;
        Ok(config)
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("SFTP_HOST", &self.sftp.host)?;
        validate_non_empty_string("SFTP_USERNAME", &self.sftp.username)?;
        validate_range(
            "sftp.ready_timeout_seconds",
            self.sftp.ready_timeout.as_secs(),
            1,
            600,
        )?;
        self.server.socket_addr()?;

        validate_path("documents.output_dir", &self.documents.output_dir)?;
        validate_path("documents.french_file", &self.documents.french_file)?;
        validate_path("documents.english_file", &self.documents.english_file)?;
        validate_path("documents.log_file", &self.documents.log_file)?;

        validate_path("remote.french_calendar", &self.remote.french_calendar)?;
        validate_path("remote.english_calendar", &self.remote.english_calendar)?;
        for target in &self.remote.refresh_targets {
            validate_path("remote.refresh_targets", target)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_env() -> EnvSettings {
        EnvSettings {
            sftp_host: Some("sftp.example.org".to_string()),
            sftp_port: "2222".to_string(),
            sftp_username: Some("deploy".to_string()),
            sftp_password: Some("secret".to_string()),
            listen_port: "8082".to_string(),
        }
    }

    #[test]
    fn test_from_parts_with_defaults() {
        let config = RelayConfig::from_parts(complete_env(), FileConfig::default()).unwrap();

        assert_eq!(config.sftp.port, 2222);
        assert_eq!(config.sftp.ready_timeout, Duration::from_secs(30));
        assert_eq!(config.server.port, 8082);
        assert_eq!(
            config.server.socket_addr().unwrap(),
            "0.0.0.0:8082".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.documents.log_path(), PathBuf::from("./app.log"));
    }

    #[test]
    fn test_each_credential_is_required() {
        for field in ["SFTP_HOST", "SFTP_USERNAME", "SFTP_PASSWORD"] {
            let mut env = complete_env();
            match field {
                "SFTP_HOST" => env.sftp_host = None,
                "SFTP_USERNAME" => env.sftp_username = None,
                _ => env.sftp_password = None,
            }

            match RelayConfig::from_parts(env, FileConfig::default()) {
                Err(RelayError::MissingConfigError { field: missing }) => {
                    assert_eq!(missing, field)
                }
                other => panic!("expected missing {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut env = complete_env();
        env.sftp_port = "not-a-port".to_string();
        assert!(RelayConfig::from_parts(env, FileConfig::default()).is_err());
    }

    #[test]
    fn test_timeout_out_of_range_is_rejected() {
        let mut file = FileConfig::default();
        file.sftp.ready_timeout_seconds = Some(0);
        assert!(RelayConfig::from_parts(complete_env(), file).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let config = RelayConfig::from_parts(complete_env(), FileConfig::default()).unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
