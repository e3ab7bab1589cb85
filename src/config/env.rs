use std::env;

pub const DEFAULT_SFTP_PORT: &str = "22";
pub const DEFAULT_LISTEN_PORT: &str = "8082";

/// Raw settings read from the process environment. Nothing is validated here.
#[derive(Clone, Default)]
pub struct EnvSettings {
    pub sftp_host: Option<String>,
    pub sftp_port: String,
    pub sftp_username: Option<String>,
    pub sftp_password: Option<String>,
    pub listen_port: String,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            sftp_host: get("SFTP_HOST"),
            sftp_port: get("SFTP_PORT").unwrap_or_else(|| DEFAULT_SFTP_PORT.to_string()),
            sftp_username: get("SFTP_USERNAME"),
            sftp_password: get("SFTP_PASSWORD"),
            listen_port: get("PORT").unwrap_or_else(|| DEFAULT_LISTEN_PORT.to_string()),
        }
    }
}

impl std::fmt::Debug for EnvSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSettings")
            .field("sftp_host", &self.sftp_host)
            .field("sftp_port", &self.sftp_port)
            .field("sftp_username", &self.sftp_username)
            .field("sftp_password", &self.sftp_password.as_ref().map(|_| "***"))
            .field("listen_port", &self.listen_port)
            .finish()
    }
}
