//! Mission core: pure state machine for monitoring the job-discovery agent.
mod effect;
mod event_log;
mod filter;
mod launcher;
mod model;
mod msg;
mod state;
mod stats;
mod sync;
mod update;
mod view_model;

pub use effect::Effect;
pub use event_log::{LogAggregator, LogEntry, Severity, DEFAULT_LOG_CAPACITY};
pub use filter::FilterModel;
pub use launcher::{
    LaunchRejection, SearchLauncher, LAUNCH_ACCEPTED, LAUNCH_ANNOUNCEMENT, LAUNCH_UNREACHABLE,
};
pub use model::{
    ApiError, FilterSnapshot, Job, Language, Stats, Status, SubmitOutcome, IDLE_MESSAGE,
};
pub use msg::Msg;
pub use state::{AppState, CoreSettings};
pub use stats::{StatsCache, DEFAULT_RECENT_JOBS_LIMIT};
pub use sync::{Lifecycle, Observation, RequestSeq, StatusSynchronizer};
pub use update::update;
pub use view_model::AppViewModel;
