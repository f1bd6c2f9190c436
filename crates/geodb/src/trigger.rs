use std::path::PathBuf;

use tracing::debug;

use crate::feedback::{Feedback, Reporter};
use crate::fetch::Fetcher;
use crate::layout::{DEFAULT_DATABASE_NAME, DatabaseLayout};
use crate::sync::{SyncError, SyncOutcome, sync_database};
use crate::urls::UrlTemplates;

/// What asked for the database to be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Package manager finished installing dependencies.
    PostInstall,
    /// Package manager finished updating dependencies.
    PostUpdate,
    /// Run directly by a user or scheduler.
    Manual,
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PostInstall => write!(f, "post-install"),
            Self::PostUpdate => write!(f, "post-update"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Everything a lifecycle hook needs to run a sync.
#[derive(Debug, Clone)]
pub struct HookConfig {
    pub license_key: Option<String>,
    pub install_dir: PathBuf,
    pub database_name: String,
    pub templates: UrlTemplates,
}

impl HookConfig {
    pub fn new(install_dir: impl Into<PathBuf>, license_key: Option<String>) -> Self {
        Self {
            license_key,
            install_dir: install_dir.into(),
            database_name: DEFAULT_DATABASE_NAME.to_owned(),
            templates: UrlTemplates::default(),
        }
    }

    /// The configured license key, trimmed; blank keys count as missing.
    pub fn license_key(&self) -> Option<&str> {
        self.license_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn layout(&self) -> DatabaseLayout {
        DatabaseLayout::new(&self.install_dir, &self.database_name)
    }
}

/// Entry point for the host's lifecycle hook.
///
/// Refuses to touch the network without a license key. All outcomes are
/// reported through `reporter`; the result is returned for callers that
/// want to act on it.
pub async fn handle_event(
    event: LifecycleEvent,
    config: &HookConfig,
    fetcher: &dyn Fetcher,
    reporter: &dyn Reporter,
) -> Result<SyncOutcome, SyncError> {
    debug!(%event, dir = %config.install_dir.display(), "lifecycle event received");

    let Some(license_key) = config.license_key() else {
        let err = SyncError::ConfigurationMissing(
            "no MaxMind license key set; provide `license_key` in the config file or MAXMIND_LICENSE_KEY"
                .into(),
        );
        reporter.report(Feedback::error(err.to_string()));
        return Err(err);
    };

    let urls = config.templates.resolve(license_key);
    sync_database(fetcher, &config.layout(), &urls, reporter).await
}
