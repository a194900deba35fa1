use std::path::PathBuf;

use crate::{ApiError, Job, Language, RequestSeq, Stats, Status, SubmitOutcome};

/// Input to [`crate::update`].
///
/// Messages that may produce a log entry carry the time label `at` so the
/// state machine never reads a clock itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The session task started; load the initial stats.
    SessionStarted,
    /// Poll timer fired.
    PollTick,
    /// A status request finished.
    StatusPolled {
        seq: RequestSeq,
        result: Result<Status, ApiError>,
        at: String,
    },
    StatsFetched(Result<Stats, ApiError>),
    JobsFetched(Result<Vec<Job>, ApiError>),
    /// User asked to launch a mission with the current filters.
    LaunchClicked { at: String },
    /// The launch request finished.
    LaunchResolved {
        result: Result<SubmitOutcome, ApiError>,
        at: String,
    },
    RoleToggled(String),
    LocationChanged(String),
    LanguageSelected(Language),
    /// User asked for a fresh copy of the recent jobs list.
    RefreshJobsClicked,
    ExportClicked { at: String },
    /// The report download finished; `Ok` carries the written path.
    ReportSaved {
        result: Result<PathBuf, String>,
        at: String,
    },
    NoOp,
}
