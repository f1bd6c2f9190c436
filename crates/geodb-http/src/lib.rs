use std::path::Path;
use std::time::Duration;

use geodb::{Fetcher, LicensedUrl, SyncError};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Upper bound on a single transfer, connect to last byte.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

const USER_AGENT: &str = concat!("geolite-sync/", env!("CARGO_PKG_VERSION"));

/// Downloads remote resources over HTTP(S) straight to disk.
///
/// Any failure (connection error, non-success status, timeout, unwritable
/// destination) is reported as `SyncError::Network`. Error messages carry
/// the URL template only, never the licensed URL.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, SyncError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SyncError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, destination: &Path, url: &LicensedUrl) -> Result<(), SyncError> {
        debug!(%url, destination = %destination.display(), "fetching");

        let mut response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        if !response.status().is_success() {
            return Err(SyncError::Network(format!(
                "{url} returned HTTP {}",
                response.status()
            )));
        }

        let mut file = tokio::fs::File::create(destination).await.map_err(|e| {
            SyncError::Network(format!("cannot write {}: {e}", destination.display()))
        })?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|e| request_error(url, e))? {
            file.write_all(&chunk).await.map_err(|e| {
                SyncError::Network(format!("cannot write {}: {e}", destination.display()))
            })?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| {
            SyncError::Network(format!("cannot write {}: {e}", destination.display()))
        })?;

        debug!(%url, bytes = written, "fetched");
        Ok(())
    }
}

fn request_error(url: &LicensedUrl, err: reqwest::Error) -> SyncError {
    let reason = if err.is_timeout() {
        "timed out".to_owned()
    } else {
        err.without_url().to_string()
    };
    SyncError::Network(format!("download of {url} failed: {reason}"))
}
