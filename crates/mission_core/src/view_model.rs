use crate::{FilterModel, Job, Lifecycle, LogEntry, Stats, Status};

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub status: Status,
    pub lifecycle: Lifecycle,
    pub stats: Stats,
    pub recent_jobs: Vec<Job>,
    /// Oldest first.
    pub logs: Vec<LogEntry>,
    /// Count of log entries ever appended; lets a renderer skip what it printed.
    pub logs_appended: u64,
    pub filters: FilterModel,
    pub launching: bool,
    pub can_launch: bool,
    pub can_export: bool,
    pub dirty: bool,
}

impl Default for AppViewModel {
    fn default() -> Self {
        crate::AppState::new().view()
    }
}
