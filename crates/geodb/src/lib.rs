pub mod archive;
pub mod feedback;
pub mod fetch;
pub mod fs;
pub mod hash;
pub mod layout;
pub mod sync;
pub mod trigger;
pub mod urls;

pub use archive::{ExtractError, extract};
pub use feedback::{CollectingReporter, Feedback, Reporter};
pub use fetch::Fetcher;
pub use hash::{compute_hash, read_token};
pub use layout::{DEFAULT_DATABASE_NAME, DatabaseLayout};
pub use sync::{MAX_ATTEMPTS, SyncError, SyncOutcome, sync_database};
pub use trigger::{HookConfig, LifecycleEvent, handle_event};
pub use urls::{LICENSE_PLACEHOLDER, LicensedUrl, RemoteUrls, UrlTemplates};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
