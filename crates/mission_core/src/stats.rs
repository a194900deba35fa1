use crate::{Job, Stats};

pub const DEFAULT_RECENT_JOBS_LIMIT: usize = 5;

/// Aggregate counters plus the short list of most recent job leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsCache {
    stats: Stats,
    recent_jobs: Vec<Job>,
    jobs_limit: usize,
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::with_jobs_limit(DEFAULT_RECENT_JOBS_LIMIT)
    }
}

impl StatsCache {
    pub fn with_jobs_limit(jobs_limit: usize) -> Self {
        Self {
            stats: Stats::default(),
            recent_jobs: Vec::new(),
            jobs_limit: jobs_limit.max(1),
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn recent_jobs(&self) -> &[Job] {
        &self.recent_jobs
    }

    pub fn jobs_limit(&self) -> usize {
        self.jobs_limit
    }

    /// Replaces the counters. Returns the job limit to fetch with when the
    /// store holds any jobs, which makes the jobs refresh follow the stats.
    pub fn apply_stats(&mut self, stats: Stats) -> Option<usize> {
        self.stats = stats;
        (stats.total_jobs > 0).then_some(self.jobs_limit)
    }

    pub fn apply_jobs(&mut self, mut jobs: Vec<Job>) {
        jobs.truncate(self.jobs_limit);
        self.recent_jobs = jobs;
    }
}
