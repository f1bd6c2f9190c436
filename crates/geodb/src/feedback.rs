use std::sync::Mutex;

/// Progress and status messages emitted while syncing the database.
///
/// The orchestrator never prints directly; callers decide how to present
/// feedback (the CLI writes to the terminal, library consumers can log,
/// collect or ignore it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Step-by-step narration, only interesting in verbose mode.
    Detail(String),
    /// Informational message (progress, status updates).
    Info(String),
    /// Warning - operation continued but something noteworthy occurred.
    Warning(String),
    /// Error - the sync was aborted.
    Error(String),
}

impl Feedback {
    pub fn detail(msg: impl Into<String>) -> Self {
        Self::Detail(msg.into())
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Warning(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, Self::Detail(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    pub fn is_info(&self) -> bool {
        matches!(self, Self::Info(_))
    }

    /// Get the message text.
    pub fn message(&self) -> &str {
        match self {
            Self::Detail(msg) | Self::Info(msg) | Self::Warning(msg) | Self::Error(msg) => msg,
        }
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detail(msg) | Self::Info(msg) => write!(f, "{msg}"),
            Self::Warning(msg) => write!(f, "warning: {msg}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Receives feedback as the sync progresses.
pub trait Reporter: Send + Sync {
    fn report(&self, feedback: Feedback);
}

/// Reporter that keeps every message in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    items: Mutex<Vec<Feedback>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, in order.
    pub fn items(&self) -> Vec<Feedback> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Feedback> {
        self.items().into_iter().filter(Feedback::is_error).collect()
    }

    pub fn warnings(&self) -> Vec<Feedback> {
        self.items()
            .into_iter()
            .filter(Feedback::is_warning)
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, feedback: Feedback) {
        if let Ok(mut items) = self.items.lock() {
            items.push(feedback);
        }
    }
}
