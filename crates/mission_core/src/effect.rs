use crate::{FilterModel, RequestSeq};

/// Side effects requested by [`crate::update`], executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchStatus { seq: RequestSeq },
    FetchStats,
    FetchRecentJobs { limit: usize },
    SubmitSearch { filters: FilterModel },
    DownloadReport,
}
