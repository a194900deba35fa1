use std::sync::Once;

use mission_core::{
    update, ApiError, AppState, Effect, Job, Lifecycle, Msg, Severity, Stats, Status,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mission_logging::initialize_for_tests);
}

fn active(progress: u8, message: &str) -> Status {
    Status {
        active: true,
        progress,
        message: message.to_string(),
        ..Status::default()
    }
}

fn finished(message: &str) -> Status {
    Status {
        active: false,
        progress: 100,
        message: message.to_string(),
        ready_to_download: true,
        ..Status::default()
    }
}

/// Issues a poll and feeds back `status` as its answer.
fn poll(state: AppState, status: Status) -> (AppState, Vec<Effect>) {
    let (state, effects) = update(state, Msg::PollTick);
    let seq = match effects.as_slice() {
        [Effect::FetchStatus { seq }] => *seq,
        other => panic!("expected a status fetch, got {other:?}"),
    };
    update(
        state,
        Msg::StatusPolled {
            seq,
            result: Ok(status),
            at: "12:00:00".to_string(),
        },
    )
}

fn count_stats_fetches(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::FetchStats))
        .count()
}

#[test]
fn session_start_fetches_stats_once() {
    let (_state, effects) = update(AppState::new(), Msg::SessionStarted);
    assert_eq!(effects, vec![Effect::FetchStats]);
}

#[test]
fn poll_ticks_issue_increasing_sequence_numbers() {
    let (state, first) = update(AppState::new(), Msg::PollTick);
    let (_state, second) = update(state, Msg::PollTick);

    assert_eq!(first, vec![Effect::FetchStatus { seq: 1 }]);
    assert_eq!(second, vec![Effect::FetchStatus { seq: 2 }]);
}

#[test]
fn repeated_active_message_is_logged_once() {
    init_logging();
    let (state, _) = poll(AppState::new(), active(10, "Deploying agent for Nurse..."));
    let (state, _) = poll(state, active(20, "Deploying agent for Nurse..."));
    let (state, _) = poll(state, active(30, "Deploying agent for Nurse..."));

    let messages: Vec<_> = state.logs().iter().map(|e| e.message().to_string()).collect();
    assert_eq!(messages, vec!["Deploying agent for Nurse...".to_string()]);
    assert_eq!(state.logs().iter().next().unwrap().severity(), Severity::Info);
}

#[test]
fn message_changes_while_idle_are_not_logged() {
    let (state, _) = poll(AppState::new(), finished("No jobs found."));
    let (state, _) = poll(state, Status::default());

    assert!(state.logs().is_empty());
}

#[test]
fn completion_cascade_fires_once_after_third_poll() {
    init_logging();
    let (state, e1) = poll(AppState::new(), active(40, "Gathering Nurse leads..."));
    let (state, e2) = poll(state, active(70, "Role Nurse complete: Scanned 3 new strict matches."));
    let (state, e3) = poll(state, finished("Finished! Found 3 total (3 new saved)."));

    assert_eq!(count_stats_fetches(&e1), 0);
    assert_eq!(count_stats_fetches(&e2), 0);
    assert_eq!(count_stats_fetches(&e3), 1);
    assert_eq!(state.synchronizer().completions(), 1);
    assert_eq!(state.view().lifecycle, Lifecycle::Idle);

    // Stats arrive and drive the jobs fetch.
    let (state, effects) = update(
        state,
        Msg::StatsFetched(Ok(Stats {
            total_jobs: 3,
            total_scans: 1,
        })),
    );
    assert_eq!(effects, vec![Effect::FetchRecentJobs { limit: 5 }]);

    // Staying idle never re-fires the edge.
    let (state, e4) = poll(state, finished("Finished! Found 3 total (3 new saved)."));
    let (state, e5) = poll(state, Status::default());
    assert_eq!(count_stats_fetches(&e4) + count_stats_fetches(&e5), 0);
    assert_eq!(state.synchronizer().completions(), 1);

    let last = state.logs().iter().last().unwrap();
    assert_eq!(last.severity(), Severity::Success);
    assert_eq!(last.message(), "Finished! Found 3 total (3 new saved).");
}

#[test]
fn every_mission_fires_its_own_edge() {
    let mut state = AppState::new();
    let mut edges = 0;
    for _ in 0..3 {
        let (next, effects) = poll(state, active(50, "Running"));
        edges += count_stats_fetches(&effects);
        let (next, effects) = poll(next, active(60, "Running"));
        edges += count_stats_fetches(&effects);
        let (next, effects) = poll(next, finished("Done"));
        edges += count_stats_fetches(&effects);
        state = next;
    }
    assert_eq!(edges, 3);
    assert_eq!(state.synchronizer().completions(), 3);
}

#[test]
fn stats_without_jobs_do_not_fetch_jobs() {
    let (state, effects) = update(AppState::new(), Msg::StatsFetched(Ok(Stats::default())));
    assert!(effects.is_empty());
    assert_eq!(state.view().stats, Stats::default());
}

#[test]
fn failed_poll_keeps_held_status_and_logs_nothing() {
    init_logging();
    let (state, _) = poll(AppState::new(), active(40, "Gathering"));
    let before = state.view();

    let (state, _) = update(state, Msg::PollTick);
    let (state, effects) = update(
        state,
        Msg::StatusPolled {
            seq: 2,
            result: Err(ApiError::Network("connection refused".to_string())),
            at: "12:00:03".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().status, before.status);
    assert_eq!(state.logs().len(), before.logs.len());
}

#[test]
fn stale_response_after_newer_one_is_discarded() {
    init_logging();
    let mut state = AppState::new();
    for _ in 0..4 {
        state = update(state, Msg::PollTick).0;
    }

    let newest = active(70, "Sequence four");
    let (state, _) = update(
        state,
        Msg::StatusPolled {
            seq: 4,
            result: Ok(newest.clone()),
            at: "12:00:12".to_string(),
        },
    );
    let (state, effects) = update(
        state,
        Msg::StatusPolled {
            seq: 3,
            result: Ok(Status::default()),
            at: "12:00:13".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.held_status(), &newest);
    assert_eq!(state.synchronizer().last_admitted(), 4);
    // The stale idle reply must not have produced a completion edge either.
    assert_eq!(state.synchronizer().completions(), 0);
}

#[test]
fn reply_to_superseded_poll_is_discarded_before_newer_reply_lands() {
    init_logging();
    let mut state = AppState::new();
    for _ in 0..2 {
        state = update(state, Msg::PollTick).0;
    }

    // Poll #1 finishes first, but poll #2 was already issued.
    let (state, effects) = update(
        state,
        Msg::StatusPolled {
            seq: 1,
            result: Ok(active(10, "First")),
            at: "12:00:00".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.held_status(), &Status::default());
    assert_eq!(state.synchronizer().last_admitted(), 0);
    assert!(state.logs().is_empty());

    let (state, _) = update(
        state,
        Msg::StatusPolled {
            seq: 2,
            result: Ok(active(20, "Second")),
            at: "12:00:03".to_string(),
        },
    );
    assert_eq!(state.held_status().message, "Second");
    assert_eq!(state.synchronizer().last_admitted(), 2);
}

#[test]
fn superseded_idle_reply_fires_no_completion() {
    let (state, _) = poll(AppState::new(), active(60, "Gathering"));
    let state = update(state, Msg::PollTick).0;
    let state = update(state, Msg::PollTick).0;
    let issued = state.synchronizer().last_issued();

    let (state, effects) = update(
        state,
        Msg::StatusPolled {
            seq: issued - 1,
            result: Ok(finished("Finished! Found 2 total (2 new saved).")),
            at: "12:00:06".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.held_status().active);
    assert_eq!(state.synchronizer().completions(), 0);
}

#[test]
fn repeated_reply_for_current_poll_is_applied_once() {
    let (state, _) = poll(AppState::new(), active(30, "Gathering"));
    let seq = state.synchronizer().last_issued();
    let (state, _) = update(
        state,
        Msg::StatusPolled {
            seq,
            result: Ok(Status::default()),
            at: "12:00:04".to_string(),
        },
    );
    assert!(state.held_status().active);
    assert_eq!(state.synchronizer().completions(), 0);
}

#[test]
fn response_for_unissued_sequence_is_ignored() {
    let (state, _) = update(
        AppState::new(),
        Msg::StatusPolled {
            seq: 9,
            result: Ok(active(10, "Phantom")),
            at: "12:00:00".to_string(),
        },
    );
    assert_eq!(state.held_status(), &Status::default());
}

#[test]
fn ready_to_download_only_seen_while_inactive() {
    let statuses = [
        active(10, "a"),
        finished("done"),
        active(5, "b"),
        finished("done again"),
        Status::default(),
    ];
    let mut state = AppState::new();
    for status in statuses {
        state = poll(state, status).0;
        let view = state.view();
        assert!(!(view.status.ready_to_download && view.status.active));
        assert_eq!(view.can_export, view.status.ready_to_download);
    }
}

#[test]
fn jobs_projection_is_replaced_and_bounded() {
    let job = |id: i64| Job {
        id,
        title: format!("Job {id}"),
        company: String::new(),
        location: String::new(),
        emails: String::new(),
        link: format!("https://example.com/{id}"),
        source: "LinkedIn".to_string(),
        created_at: None,
    };
    let (state, _) = update(AppState::new(), Msg::JobsFetched(Ok((1..=8).map(job).collect())));
    assert_eq!(state.view().recent_jobs.len(), 5);

    let (state, _) = update(state, Msg::JobsFetched(Ok(vec![job(42)])));
    assert_eq!(state.view().recent_jobs, vec![job(42)]);

    let (state, _) = update(
        state,
        Msg::JobsFetched(Err(ApiError::Protocol("bad json".to_string()))),
    );
    assert_eq!(state.view().recent_jobs, vec![job(42)]);
}

#[test]
fn refresh_requests_jobs_with_configured_limit() {
    let state = AppState::with_settings(mission_core::CoreSettings {
        log_capacity: 10,
        recent_jobs_limit: 12,
    });
    let (_state, effects) = update(state, Msg::RefreshJobsClicked);
    assert_eq!(effects, vec![Effect::FetchRecentJobs { limit: 12 }]);
}

#[test]
fn log_never_exceeds_configured_capacity() {
    let mut state = AppState::with_settings(mission_core::CoreSettings {
        log_capacity: 7,
        recent_jobs_limit: 5,
    });
    for n in 0..30u8 {
        state = poll(state, active(n, &format!("step {n}"))).0;
        assert!(state.view().logs.len() <= 7);
    }
    let messages: Vec<_> = state.view().logs.iter().map(|e| e.message().to_string()).collect();
    let expected: Vec<_> = (23..30).map(|n| format!("step {n}")).collect();
    assert_eq!(messages, expected);
}
