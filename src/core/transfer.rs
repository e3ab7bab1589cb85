use crate::domain::ports::{TransferClient, TransferSession};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A unit of work that needs an open session.
#[async_trait]
pub trait SessionWork<S: TransferSession>: Send {
    type Output: Send;

    async fn run(self, session: &mut S) -> Result<Self::Output>;
}

/// Connects, runs `work`, then closes the session exactly once whatever `work` returned.
///
/// A failed connect leaves nothing to close. When both `work` and `close` fail,
/// the error from `work` is returned and the close error is only logged.
pub async fn with_session<C, W>(client: &C, work: W) -> Result<W::Output>
where
    C: TransferClient,
    W: SessionWork<C::Session>,
{
    let mut session = client.connect().await?;

    let result = work.run(&mut session).await;
    let closed = session.close().await;

    match (result, closed) {
        (Ok(output), Ok(())) => Ok(output),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            tracing::warn!("Closing the transfer session also failed: {}", close_err);
            Err(err)
        }
    }
}

/// Re-uploads a remote file's current bytes so the host bumps its modification time.
///
/// The bytes go through a fresh temporary file, never through a generated document.
pub async fn refresh_metadata<S: TransferSession>(session: &mut S, remote_path: &str) -> Result<()> {
    let data = session.fetch(remote_path).await?;

    let temp = tempfile::Builder::new()
        .prefix("calendar-relay-refresh-")
        .tempfile()?;
    tokio::fs::write(temp.path(), &data).await?;

    session.upload(temp.path(), remote_path).await?;
    tracing::debug!("Refreshed metadata of {} ({} bytes)", remote_path, data.len());
    Ok(())
}
