use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Build the log filter from `RUST_LOG`-style directives.
///
/// Directives win over the baseline; without any, only warnings are shown,
/// or everything down to debug with `--verbose`.
pub fn log_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Install the stderr subscriber for the process.
pub fn init(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, directives.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use tracing::Level;
    use tracing_subscriber::prelude::*;

    use super::*;

    /// Which of (debug, info, warn) the filter lets through.
    fn levels(filter: EnvFilter) -> (bool, bool, bool) {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            (
                tracing::enabled!(Level::DEBUG),
                tracing::enabled!(Level::INFO),
                tracing::enabled!(Level::WARN),
            )
        })
    }

    #[test]
    fn rust_log_overrides_quiet_default() {
        assert_eq!(levels(log_filter(false, Some("debug"))), (true, true, true));
        assert_eq!(levels(log_filter(false, Some("info"))), (false, true, true));
    }

    #[test]
    fn default_shows_warnings_only() {
        assert_eq!(levels(log_filter(false, None)), (false, false, true));
        assert_eq!(levels(log_filter(false, Some(""))), (false, false, true));
    }

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(levels(log_filter(true, None)), (true, true, true));
    }

    #[test]
    fn invalid_directives_fall_back_to_default() {
        assert_eq!(levels(log_filter(false, Some("geodb=loud"))), (false, false, true));
    }
}
