use anyhow::{Result, bail};
use geodb::{Feedback, HookConfig, LifecycleEvent, Reporter, SyncOutcome, handle_event};
use geodb_http::HttpFetcher;

/// Prints feedback to the terminal: progress to stdout, problems to stderr.
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, feedback: Feedback) {
        match feedback {
            Feedback::Detail(_) if !self.verbose => {}
            Feedback::Detail(_) | Feedback::Info(_) => println!("{feedback}"),
            Feedback::Warning(_) | Feedback::Error(_) => eprintln!("{feedback}"),
        }
    }
}

/// Run one sync for `event` and turn failure into a non-zero exit.
pub async fn run(event: LifecycleEvent, config: &HookConfig, verbose: bool) -> Result<()> {
    let reporter = ConsoleReporter::new(verbose);
    let fetcher = HttpFetcher::new()?;

    // Failures were already reported through the console reporter.
    match handle_event(event, config, &fetcher, &reporter).await {
        Ok(SyncOutcome::UpToDate { .. }) => Ok(()),
        Ok(SyncOutcome::Updated { attempts, .. }) => {
            tracing::debug!(attempts, "database updated");
            Ok(())
        }
        Err(e) => bail!("database sync failed: {e}"),
    }
}
