use crate::config::{DocumentConfig, RemoteConfig};
use crate::utils::error::{RelayError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shape of the optional `--config` file. Every section may be left out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub sftp: SftpSection,
    pub documents: DocumentConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SftpSection {
    pub ready_timeout_seconds: Option<u64>,
}

impl FileConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// `${NAME}` placeholders are resolved through `lookup`; unknown names stay as written.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = substitute_env_vars(content, lookup)?;
        Ok(toml::from_str(&processed_content)?)
    }
}

fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
        message: format!("placeholder pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml_str("").unwrap();

        assert_eq!(config.documents.french_file, "data_calendrier.html");
        assert_eq!(config.documents.english_file, "data_calendar.html");
        assert_eq!(config.remote.refresh_targets.len(), 2);
        assert!(config.server.bind_address.is_none());
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml_content = r#"
[sftp]
ready_timeout_seconds = 10

[documents]
output_dir = "/var/lib/relay"

[remote]
french_calendar = "/site/fr/calendar.html"
refresh_targets = ["/site/index.html"]
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.sftp.ready_timeout_seconds, Some(10));
        assert_eq!(config.documents.output_dir, "/var/lib/relay");
        assert_eq!(config.documents.log_file, "app.log");
        assert_eq!(config.remote.french_calendar, "/site/fr/calendar.html");
        assert_eq!(
            config.remote.english_calendar,
            RemoteConfig::default().english_calendar
        );
        assert_eq!(config.remote.refresh_targets, vec!["/site/index.html"]);
    }

    #[test]
    fn test_placeholder_substitution() {
        let toml_content = r#"
[documents]
output_dir = "${RELAY_HOME}/out"
log_file = "${UNSET_NAME}.log"
"#;

        let config = FileConfig::from_toml_str_with(toml_content, |name| {
            (name == "RELAY_HOME").then(|| "/srv/relay".to_string())
        })
        .unwrap();

        assert_eq!(config.documents.output_dir, "/srv/relay/out");
        assert_eq!(config.documents.log_file, "${UNSET_NAME}.log");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = FileConfig::from_toml_str("[remote]\nfrench = \"/x\"\n");
        assert!(matches!(result, Err(RelayError::TomlError(_))));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nbind_address = \"127.0.0.1\"\n")
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.bind_address.as_deref(), Some("127.0.0.1"));
    }
}
