use mission_logging::{mission_debug, mission_info, mission_trace, mission_warn};

use crate::{
    ApiError, AppState, Effect, LogEntry, Msg, RequestSeq, Severity, Status, SubmitOutcome,
    LAUNCH_ACCEPTED, LAUNCH_ANNOUNCEMENT, LAUNCH_UNREACHABLE,
};

const EXPORT_NOT_READY: &str = "No report is ready for export";
const EXPORT_STARTED: &str = "Downloading report...";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionStarted => vec![Effect::FetchStats],
        Msg::PollTick => {
            let seq = state.sync.issue();
            mission_trace!("Issuing status poll #{}", seq);
            vec![Effect::FetchStatus { seq }]
        }
        Msg::StatusPolled { seq, result, at } => match result {
            Ok(status) => apply_status(&mut state, seq, status, at),
            Err(err) => {
                // The next tick is the retry.
                mission_debug!("Status poll #{} failed: {}", seq, err);
                Vec::new()
            }
        },
        Msg::StatsFetched(result) => match result {
            Ok(stats) => {
                let follow_up = state.stats.apply_stats(stats);
                state.mark_dirty();
                follow_up
                    .map(|limit| vec![Effect::FetchRecentJobs { limit }])
                    .unwrap_or_default()
            }
            Err(err) => {
                mission_warn!("Failed to fetch stats: {}", err);
                Vec::new()
            }
        },
        Msg::JobsFetched(result) => {
            match result {
                Ok(jobs) => {
                    state.stats.apply_jobs(jobs);
                    state.mark_dirty();
                }
                Err(err) => mission_warn!("Failed to fetch recent jobs: {}", err),
            }
            Vec::new()
        }
        Msg::LaunchClicked { at } => {
            let attempt = state.launcher.begin(state.sync.held(), &state.filters);
            state.mark_dirty();
            match attempt {
                Ok(filters) => {
                    mission_info!(
                        "Launching mission roles={:?} location={} language={}",
                        filters.roles(),
                        filters.location(),
                        filters.language()
                    );
                    state
                        .logs
                        .push(LogEntry::new(at, LAUNCH_ANNOUNCEMENT, Severity::System));
                    vec![Effect::SubmitSearch { filters }]
                }
                Err(rejection) => {
                    state
                        .logs
                        .push(LogEntry::new(at, rejection.to_string(), Severity::Error));
                    Vec::new()
                }
            }
        }
        Msg::LaunchResolved { result, at } => {
            apply_launch_result(&mut state, result, at);
            Vec::new()
        }
        Msg::RoleToggled(role) => {
            state.filters.toggle(&role);
            state.mark_dirty();
            Vec::new()
        }
        Msg::LocationChanged(location) => {
            state.filters.set_location(location);
            state.mark_dirty();
            Vec::new()
        }
        Msg::LanguageSelected(language) => {
            state.filters.set_language(language);
            state.mark_dirty();
            Vec::new()
        }
        Msg::RefreshJobsClicked => vec![Effect::FetchRecentJobs {
            limit: state.stats.jobs_limit(),
        }],
        Msg::ExportClicked { at } => {
            state.mark_dirty();
            if state.sync.held().ready_to_download {
                state
                    .logs
                    .push(LogEntry::new(at, EXPORT_STARTED, Severity::System));
                vec![Effect::DownloadReport]
            } else {
                state
                    .logs
                    .push(LogEntry::new(at, EXPORT_NOT_READY, Severity::Error));
                Vec::new()
            }
        }
        Msg::ReportSaved { result, at } => {
            let entry = match result {
                Ok(path) => LogEntry::new(
                    at,
                    format!("Report saved to {}", path.display()),
                    Severity::Success,
                ),
                Err(reason) => LogEntry::new(
                    at,
                    format!("Report export failed: {reason}"),
                    Severity::Error,
                ),
            };
            state.logs.push(entry);
            state.mark_dirty();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_status(state: &mut AppState, seq: RequestSeq, status: Status, at: String) -> Vec<Effect> {
    let Some(observation) = state.sync.admit(seq, status) else {
        mission_debug!(
            "Discarding stale status #{} (admitted #{})",
            seq,
            state.sync.last_admitted()
        );
        return Vec::new();
    };
    state.mark_dirty();

    if let Some(message) = &observation.new_message {
        state
            .logs
            .push(LogEntry::new(at.clone(), message.clone(), Severity::Info));
    }
    state.launcher.observe(&observation);

    if observation.just_completed {
        let final_message = state.sync.held().message.clone();
        mission_info!("Mission completed: {}", final_message);
        state
            .logs
            .push(LogEntry::new(at, final_message, Severity::Success));
        return vec![Effect::FetchStats];
    }
    Vec::new()
}

fn apply_launch_result(state: &mut AppState, result: Result<SubmitOutcome, ApiError>, at: String) {
    state.mark_dirty();
    match result.and_then(SubmitOutcome::into_result) {
        Ok(()) => {
            state
                .logs
                .push(LogEntry::new(at, LAUNCH_ACCEPTED, Severity::Success));
        }
        Err(ApiError::Application(reason)) => {
            mission_info!("Launch rejected by agent: {}", reason);
            state.logs.push(LogEntry::new(at, reason, Severity::Error));
            state.launcher.abort();
        }
        Err(err) => {
            mission_warn!("Launch request failed: {}", err);
            state
                .logs
                .push(LogEntry::new(at, LAUNCH_UNREACHABLE, Severity::Error));
            state.launcher.abort();
        }
    }
}
