use std::{path::PathBuf, time::Duration};

/// Busy timeout applied to every connection so concurrent writers queue up.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime configuration describing where the SQLite database lives.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file, created on first open.
    pub path: PathBuf,
    /// How long a connection waits for a competing writer.
    pub busy_timeout: Duration,
}

impl SqliteConfig {
    /// Configuration for the database file at `path` with the default busy timeout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Override how long a connection waits on a locked database.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}
