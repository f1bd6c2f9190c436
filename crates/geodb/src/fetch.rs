use std::path::Path;

use crate::sync::SyncError;
use crate::urls::LicensedUrl;

/// Retrieves a remote resource into a local file.
///
/// Implementations overwrite `destination` and must bound the total
/// transfer time, reporting a timeout as `SyncError::Network`. Content is
/// not validated here; the sync workflow verifies it.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, destination: &Path, url: &LicensedUrl) -> Result<(), SyncError>;
}
