use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::archive::{self, ExtractError};
use crate::feedback::{Feedback, Reporter};
use crate::fetch::Fetcher;
use crate::fs;
use crate::hash;
use crate::layout::DatabaseLayout;
use crate::urls::RemoteUrls;

/// Download-verify-extract cycles allowed before the update is aborted.
pub const MAX_ATTEMPTS: u32 = 3;

/// Errors that can occur during sync operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("downloaded file did not match expected hash (expected {expected}, got {actual})")]
    Integrity { expected: String, actual: String },

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("gave up after {attempts} attempts: {last}")]
    AttemptsExhausted { attempts: u32, last: Box<SyncError> },
}

impl SyncError {
    fn filesystem(action: &str, path: &Path, err: io::Error) -> Self {
        Self::Filesystem(format!("failed to {action} {}: {err}", path.display()))
    }
}

impl From<ExtractError> for SyncError {
    fn from(err: ExtractError) -> Self {
        Self::Extraction(err.to_string())
    }
}

/// How a successful sync ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote hash matched the stored one; nothing was touched.
    UpToDate { database: PathBuf },
    /// A verified download replaced the active database.
    Updated {
        database: PathBuf,
        hash: String,
        attempts: u32,
    },
}

/// Failure of a single download attempt.
enum AttemptError {
    /// Worth another download (network, hash mismatch, bad archive).
    Retry(SyncError),
    /// Filesystem trouble while staging or promoting; stop immediately.
    Fatal(SyncError),
}

/// Bring the local database in line with the remote copy.
///
/// Compares the stored hash manifest with a freshly fetched one and, when
/// they differ, downloads the archive, verifies it against the remote hash,
/// unpacks it and promotes the database together with its manifest. Up to
/// [`MAX_ATTEMPTS`] downloads are made. Whatever happens, the active
/// database is only replaced by a verified file: every failure leaves the
/// previous database and manifest exactly as they were.
///
/// Fatal errors are reported at error severity before being returned.
pub async fn sync_database(
    fetcher: &dyn Fetcher,
    layout: &DatabaseLayout,
    urls: &RemoteUrls,
    reporter: &dyn Reporter,
) -> Result<SyncOutcome, SyncError> {
    let database = layout.database();

    reporter.report(Feedback::detail(format!(
        "Making sure the DB folder exists: {}",
        layout.dir().display()
    )));
    if let Err(e) = fs::ensure_dir(layout.dir()) {
        return Err(abort(
            reporter,
            SyncError::filesystem("create", layout.dir(), e),
        ));
    }

    let local_hash = hash::read_token(&layout.hash_file()).unwrap_or_default();
    reporter.report(Feedback::detail(format!(
        "Hash of existing local DB file: {local_hash}"
    )));

    let remote_hash = match fetch_remote_hash(fetcher, layout, urls, reporter).await {
        Ok(hash) => hash,
        Err(e) => {
            discard_file(&layout.remote_hash_file());
            return Err(abort(reporter, e));
        }
    };

    if remote_hash == local_hash {
        discard_file(&layout.remote_hash_file());
        reporter.report(Feedback::info(format!(
            "The local database is already up to date. ({})",
            database.display()
        )));
        return Ok(SyncOutcome::UpToDate { database });
    }

    debug!(local = %local_hash, remote = %remote_hash, "database needs update");

    let mut attempt = 0;
    let last_error = loop {
        attempt += 1;
        match attempt_update(fetcher, layout, urls, &remote_hash, reporter).await {
            Ok(()) => {
                reporter.report(Feedback::info(format!(
                    "The local database has been updated. ({})",
                    database.display()
                )));
                return Ok(SyncOutcome::Updated {
                    database,
                    hash: remote_hash,
                    attempts: attempt,
                });
            }
            Err(AttemptError::Fatal(e)) => {
                discard_transients(layout);
                return Err(abort(reporter, e));
            }
            Err(AttemptError::Retry(e)) => {
                discard_attempt(layout);
                if attempt >= MAX_ATTEMPTS {
                    break e;
                }
                reporter.report(Feedback::warning(format!(
                    "{e} (attempt {attempt} of {MAX_ATTEMPTS}), retrying..."
                )));
            }
        }
    };

    discard_transients(layout);
    Err(abort(
        reporter,
        SyncError::AttemptsExhausted {
            attempts: attempt,
            last: Box::new(last_error),
        },
    ))
}

async fn fetch_remote_hash(
    fetcher: &dyn Fetcher,
    layout: &DatabaseLayout,
    urls: &RemoteUrls,
    reporter: &dyn Reporter,
) -> Result<String, SyncError> {
    let remote_hash_file = layout.remote_hash_file();

    reporter.report(Feedback::info("Fetching remote hash..."));
    reporter.report(Feedback::detail(format!(
        "Downloading file: {} => {}",
        urls.hash,
        remote_hash_file.display()
    )));
    fetcher.fetch(&remote_hash_file, &urls.hash).await?;

    let token = hash::read_token(&remote_hash_file)
        .ok_or_else(|| SyncError::Network(format!("remote hash manifest {} was empty", urls.hash)))?;
    reporter.report(Feedback::detail(format!(
        "Hash of current remote DB file: {token}"
    )));
    Ok(token)
}

async fn attempt_update(
    fetcher: &dyn Fetcher,
    layout: &DatabaseLayout,
    urls: &RemoteUrls,
    expected_hash: &str,
    reporter: &dyn Reporter,
) -> Result<(), AttemptError> {
    let archive_path = layout.archive();
    let workspace = layout.workspace();
    let staged = layout.staged();

    reporter.report(Feedback::info("Fetching new version of the database..."));
    reporter.report(Feedback::detail(format!(
        "Downloading file: {} => {}",
        urls.archive,
        archive_path.display()
    )));
    fetcher
        .fetch(&archive_path, &urls.archive)
        .await
        .map_err(AttemptError::Retry)?;

    reporter.report(Feedback::info(
        "Verifying integrity of the downloaded database file...",
    ));
    let actual_hash = hash::compute_hash(&archive_path)
        .map_err(|e| AttemptError::Retry(SyncError::filesystem("hash", &archive_path, e)))?;
    reporter.report(Feedback::detail(format!(
        "Hash of downloaded DB file: {actual_hash}"
    )));
    if actual_hash != expected_hash {
        return Err(AttemptError::Retry(SyncError::Integrity {
            expected: expected_hash.to_owned(),
            actual: actual_hash,
        }));
    }

    reporter.report(Feedback::info("Extracting the database..."));
    fs::remove_dir_recursive(&workspace)
        .map_err(|e| AttemptError::Fatal(SyncError::filesystem("clear", &workspace, e)))?;
    reporter.report(Feedback::detail(format!(
        "Extracting file: {} => {}",
        archive_path.display(),
        workspace.display()
    )));
    archive::extract(&archive_path, &workspace, true)
        .map_err(|e| AttemptError::Retry(e.into()))?;

    reporter.report(Feedback::detail("Seeking database file in extracted archive"));
    let Some(extracted) = fs::find_by_name(layout.name(), &workspace) else {
        return Err(AttemptError::Retry(SyncError::Extraction(format!(
            "could not find {} in the downloaded archive",
            layout.name()
        ))));
    };

    reporter.report(Feedback::detail(format!(
        "Moving extracted file to {}",
        staged.display()
    )));
    fs::rename_file(&extracted, &staged)
        .map_err(|e| AttemptError::Fatal(SyncError::filesystem("move", &extracted, e)))?;

    reporter.report(Feedback::detail(format!(
        "Removing extracted folder: {}",
        workspace.display()
    )));
    fs::remove_dir_recursive(&workspace)
        .map_err(|e| AttemptError::Fatal(SyncError::filesystem("remove", &workspace, e)))?;

    promote(layout, reporter).map_err(AttemptError::Fatal)
}

/// Swap the staged database and fetched manifest into place.
///
/// Nothing active is removed until the replacement is staged. The order
/// (remove database, remove manifest, rename database, rename manifest)
/// means an interruption can at worst leave the database missing, never
/// a database paired with the wrong manifest.
fn promote(layout: &DatabaseLayout, reporter: &dyn Reporter) -> Result<(), SyncError> {
    let database = layout.database();
    let hash_file = layout.hash_file();
    let staged = layout.staged();
    let remote_hash_file = layout.remote_hash_file();

    if !staged.is_file() || !remote_hash_file.is_file() {
        return Err(SyncError::Filesystem(format!(
            "replacement for {} is not staged",
            database.display()
        )));
    }

    reporter.report(Feedback::info(
        "Replacing previous version of the database with the downloaded one...",
    ));

    reporter.report(Feedback::detail(format!("Removing file: {}", database.display())));
    fs::remove_file(&database).map_err(|e| SyncError::filesystem("remove", &database, e))?;

    reporter.report(Feedback::detail(format!("Removing file: {}", hash_file.display())));
    fs::remove_file(&hash_file).map_err(|e| SyncError::filesystem("remove", &hash_file, e))?;

    reporter.report(Feedback::detail(format!(
        "Renaming file: {} => {}",
        staged.display(),
        database.display()
    )));
    fs::rename_file(&staged, &database).map_err(|e| SyncError::filesystem("rename", &staged, e))?;

    reporter.report(Feedback::detail(format!(
        "Renaming file: {} => {}",
        remote_hash_file.display(),
        hash_file.display()
    )));
    fs::rename_file(&remote_hash_file, &hash_file)
        .map_err(|e| SyncError::filesystem("rename", &remote_hash_file, e))
}

fn abort(reporter: &dyn Reporter, err: SyncError) -> SyncError {
    reporter.report(Feedback::error(format!(
        "Failed to update the database, aborting: {err}"
    )));
    err
}

/// Remove everything a single failed attempt may have left behind.
fn discard_attempt(layout: &DatabaseLayout) {
    discard_file(&layout.archive());
    discard_file(&layout.container());
    discard_file(&layout.staged());
    discard_dir(&layout.workspace());
}

/// Remove every transient artifact, including the fetched manifest.
fn discard_transients(layout: &DatabaseLayout) {
    for path in layout.transient_files() {
        discard_file(&path);
    }
    discard_dir(&layout.workspace());
}

fn discard_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove temporary file");
    }
}

fn discard_dir(path: &Path) {
    if let Err(e) = fs::remove_dir_recursive(path) {
        warn!(path = %path.display(), error = %e, "failed to remove temporary directory");
    }
}
