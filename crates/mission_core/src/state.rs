use crate::event_log::DEFAULT_LOG_CAPACITY;
use crate::stats::DEFAULT_RECENT_JOBS_LIMIT;
use crate::view_model::AppViewModel;
use crate::{FilterModel, LogAggregator, SearchLauncher, StatsCache, Status, StatusSynchronizer};

/// Tunables of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSettings {
    pub log_capacity: usize,
    pub recent_jobs_limit: usize,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            recent_jobs_limit: DEFAULT_RECENT_JOBS_LIMIT,
        }
    }
}

/// Every store of the monitor. Each field has a single writer in `update`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) sync: StatusSynchronizer,
    pub(crate) logs: LogAggregator,
    pub(crate) stats: StatsCache,
    pub(crate) filters: FilterModel,
    pub(crate) launcher: SearchLauncher,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            logs: LogAggregator::with_capacity(settings.log_capacity),
            stats: StatsCache::with_jobs_limit(settings.recent_jobs_limit),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let status = self.sync.held().clone();
        let launching = self.launcher.is_launching();
        AppViewModel {
            can_launch: !status.active && !launching,
            can_export: status.ready_to_download,
            lifecycle: self.sync.lifecycle(),
            stats: self.stats.stats(),
            recent_jobs: self.stats.recent_jobs().to_vec(),
            logs: self.logs.to_vec(),
            logs_appended: self.logs.appended(),
            filters: self.filters.clone(),
            launching,
            status,
            dirty: self.dirty,
        }
    }

    pub fn held_status(&self) -> &Status {
        self.sync.held()
    }

    pub fn synchronizer(&self) -> &StatusSynchronizer {
        &self.sync
    }

    pub fn logs(&self) -> &LogAggregator {
        &self.logs
    }

    pub fn stats_cache(&self) -> &StatsCache {
        &self.stats
    }

    pub fn filters(&self) -> &FilterModel {
        &self.filters
    }

    pub fn is_launching(&self) -> bool {
        self.launcher.is_launching()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
