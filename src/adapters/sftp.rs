use crate::config::SftpConfig;
use crate::domain::ports::{TransferClient, TransferSession};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use ssh2::{Session, Sftp};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Password-authenticated SFTP over libssh2.
///
/// libssh2 is blocking, so every call runs on the blocking thread pool and the
/// connection is handed back to the session once the call returns.
#[derive(Debug, Clone)]
pub struct SftpClient {
    config: SftpConfig,
}

impl SftpClient {
    pub fn new(config: SftpConfig) -> Self {
        Self { config }
    }
}

impl TransferClient for SftpClient {
    type Session = SftpSession;

    async fn connect(&self) -> Result<SftpSession> {
        let config = self.config.clone();
        let channel = tokio::task::spawn_blocking(move || open_channel(&config))
            .await
            .map_err(|e| RelayError::transfer("connect", e.to_string()))??;

        tracing::info!("Connected to SFTP server {}:{}", self.config.host, self.config.port);
        Ok(SftpSession {
            channel: Some(channel),
            lost: false,
        })
    }
}

struct SftpChannel {
    session: Session,
    sftp: Sftp,
}

fn open_channel(config: &SftpConfig) -> Result<SftpChannel> {
    let address = format!("{}:{}", config.host, config.port);
    let candidates: Vec<SocketAddr> = address
        .to_socket_addrs()
        .map_err(|e| RelayError::transfer("connect", format!("{}: {}", address, e)))?
        .collect();

    let tcp = connect_any(&candidates, config.ready_timeout)
        .map_err(|e| RelayError::transfer("connect", format!("{}: {}", address, e)))?;

    let mut session = Session::new()?;
    session.set_timeout(u32::try_from(config.ready_timeout.as_millis()).unwrap_or(u32::MAX));
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .map_err(|e| RelayError::transfer("handshake", format!("{}: {}", address, e)))?;

    session
        .userauth_password(&config.username, &config.password)
        .map_err(|e| RelayError::transfer("authenticate", e.to_string()))?;
    if !session.authenticated() {
        return Err(RelayError::transfer(
            "authenticate",
            format!("credentials for {} were rejected", config.username),
        ));
    }

    let sftp = session
        .sftp()
        .map_err(|e| RelayError::transfer("open sftp channel", e.to_string()))?;

    Ok(SftpChannel { session, sftp })
}

/// Tries each resolved address in turn, e.g. `::1` then `127.0.0.1` for `localhost`.
fn connect_any(candidates: &[SocketAddr], timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in candidates {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connecting to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host did not resolve to any address")
    }))
}

pub struct SftpSession {
    channel: Option<SftpChannel>,
    /// Set when a blocking call panicked and took the connection down with it.
    lost: bool,
}

impl SftpSession {
    async fn run_blocking<T, F>(&mut self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SftpChannel) -> Result<T> + Send + 'static,
    {
        let channel = self.channel.take().ok_or(RelayError::SessionClosed)?;
        let (channel, result) = match tokio::task::spawn_blocking(move || {
            let result = op(&channel);
            (channel, result)
        })
        .await
        {
            Ok(done) => done,
            Err(e) => {
                // the connection was moved into the task and is gone with it
                tracing::error!("SFTP worker failed, session is lost: {}", e);
                self.lost = true;
                return Err(RelayError::transfer("session", e.to_string()));
            }
        };

        self.channel = Some(channel);
        result
    }
}

#[async_trait]
impl TransferSession for SftpSession {
    async fn upload(&mut self, local_path: &Path, remote_path: &str) -> Result<()> {
        let local: PathBuf = local_path.to_path_buf();
        let remote = remote_path.to_string();
        tracing::debug!("Uploading {} to {}", local.display(), remote);

        self.run_blocking(move |channel| {
            let data = std::fs::read(&local)?;
            let mut file = channel
                .sftp
                .create(Path::new(&remote))
                .map_err(|e| RelayError::transfer("upload", format!("{}: {}", remote, e)))?;
            file.write_all(&data)
                .map_err(|e| RelayError::transfer("upload", format!("{}: {}", remote, e)))?;
            Ok(())
        })
        .await
    }

    async fn fetch(&mut self, remote_path: &str) -> Result<Vec<u8>> {
        let remote = remote_path.to_string();
        tracing::debug!("Fetching {}", remote);

        self.run_blocking(move |channel| {
            let mut file = channel
                .sftp
                .open(Path::new(&remote))
                .map_err(|e| RelayError::transfer("fetch", format!("{}: {}", remote, e)))?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .map_err(|e| RelayError::transfer("fetch", format!("{}: {}", remote, e)))?;
            Ok(data)
        })
        .await
    }

    async fn close(&mut self) -> Result<()> {
        let Some(SftpChannel { session, sftp }) = self.channel.take() else {
            if self.lost {
                return Err(RelayError::transfer(
                    "close",
                    "session was lost when a transfer worker failed",
                ));
            }
            return Ok(());
        };

        tokio::task::spawn_blocking(move || {
            drop(sftp);
            session
                .disconnect(None, "closing", None)
                .map_err(|e| RelayError::transfer("close", e.to_string()))
        })
        .await
        .map_err(|e| RelayError::transfer("close", e.to_string()))??;

        tracing::info!("Disconnected from SFTP server");
        Ok(())
    }
}
