use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mission_core::{update, AppState, AppViewModel, Effect, Language, Msg};
use mission_logging::{mission_debug, mission_info, mission_warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::gateway::ApiGateway;
use crate::persist::ReportWriter;

/// Produces the time label stamped on log entries.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_REPORT_FILENAME: &str = "jobs_report.xlsx";

/// Local wall-clock time as `HH:MM:SS`.
pub fn local_clock() -> Clock {
    Arc::new(|| chrono::Local::now().format("%H:%M:%S").to_string())
}

#[derive(Clone)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    pub report_dir: PathBuf,
    pub report_filename: String,
    pub clock: Clock,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            report_dir: PathBuf::from("."),
            report_filename: DEFAULT_REPORT_FILENAME.to_string(),
            clock: local_clock(),
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("poll_interval", &self.poll_interval)
            .field("report_dir", &self.report_dir)
            .field("report_filename", &self.report_filename)
            .finish_non_exhaustive()
    }
}

enum SessionCommand {
    Launch,
    ToggleRole(String),
    SetLocation(String),
    SelectLanguage(Language),
    RefreshJobs,
    ExportReport,
}

impl SessionCommand {
    fn into_msg(self, at: String) -> Msg {
        match self {
            SessionCommand::Launch => Msg::LaunchClicked { at },
            SessionCommand::ToggleRole(role) => Msg::RoleToggled(role),
            SessionCommand::SetLocation(location) => Msg::LocationChanged(location),
            SessionCommand::SelectLanguage(language) => Msg::LanguageSelected(language),
            SessionCommand::RefreshJobs => Msg::RefreshJobsClicked,
            SessionCommand::ExportReport => Msg::ExportClicked { at },
        }
    }
}

/// Handle to a running monitor session.
///
/// The session task owns the state; callers send commands and read view
/// snapshots. Dropping the handle tears the session down like [`shutdown`].
///
/// [`shutdown`]: SessionHandle::shutdown
pub struct SessionHandle {
    cmd_tx: mpsc::UnboundedSender<SessionCommand>,
    view_rx: watch::Receiver<AppViewModel>,
    cancel: CancellationToken,
    task: JoinHandle<AppState>,
    _teardown: DropGuard,
}

impl SessionHandle {
    /// Starts polling immediately. Must be called within a tokio runtime.
    pub fn spawn(gateway: Arc<dyn ApiGateway>, state: AppState, config: SessionConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(state.view());
        let cancel = CancellationToken::new();

        let session = MonitorSession {
            state,
            gateway,
            config,
            view_tx,
            results_tx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(session.run(cmd_rx, results_rx));

        Self {
            cmd_tx,
            view_rx,
            _teardown: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }

    pub fn launch(&self) {
        self.send(SessionCommand::Launch);
    }

    pub fn toggle_role(&self, role: impl Into<String>) {
        self.send(SessionCommand::ToggleRole(role.into()));
    }

    pub fn set_location(&self, location: impl Into<String>) {
        self.send(SessionCommand::SetLocation(location.into()));
    }

    pub fn select_language(&self, language: Language) {
        self.send(SessionCommand::SelectLanguage(language));
    }

    pub fn refresh_jobs(&self) {
        self.send(SessionCommand::RefreshJobs);
    }

    pub fn export_report(&self) {
        self.send(SessionCommand::ExportReport);
    }

    /// Latest published view.
    pub fn view(&self) -> AppViewModel {
        self.view_rx.borrow().clone()
    }

    /// Receiver notified whenever the view changes.
    pub fn subscribe(&self) -> watch::Receiver<AppViewModel> {
        self.view_rx.clone()
    }

    /// Stops the poll timer, drops in-flight responses and returns the final
    /// state. `None` if the session task panicked.
    pub async fn shutdown(self) -> Option<AppState> {
        self.cancel.cancel();
        self.task.await.ok()
    }

    fn send(&self, command: SessionCommand) {
        if self.cmd_tx.send(command).is_err() {
            mission_warn!("Monitor session is not running; command dropped");
        }
    }
}

struct MonitorSession {
    state: AppState,
    gateway: Arc<dyn ApiGateway>,
    config: SessionConfig,
    view_tx: watch::Sender<AppViewModel>,
    results_tx: mpsc::UnboundedSender<Msg>,
    cancel: CancellationToken,
}

impl MonitorSession {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
        mut results_rx: mpsc::UnboundedReceiver<Msg>,
    ) -> AppState {
        let cancel = self.cancel.clone();
        // interval() panics on a zero period.
        let period = self.config.poll_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        mission_info!(
            "Monitor session started (poll every {:?})",
            self.config.poll_interval
        );
        self.dispatch(Msg::SessionStarted);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(msg) = results_rx.recv() => self.dispatch(msg),
                Some(command) = cmd_rx.recv() => {
                    let at = (self.config.clock)();
                    self.dispatch(command.into_msg(at));
                }
                _ = ticker.tick() => self.dispatch(Msg::PollTick),
            }
        }

        mission_info!("Monitor session stopped");
        self.state
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        for effect in effects {
            self.execute(effect);
        }

        if self.state.consume_dirty() {
            self.view_tx.send_replace(self.state.view());
        }
    }

    fn execute(&self, effect: Effect) {
        mission_debug!("Executing {:?}", effect);
        let gateway = Arc::clone(&self.gateway);
        let results = self.results_tx.clone();
        let cancel = self.cancel.clone();
        let clock = Arc::clone(&self.config.clock);
        let writer = ReportWriter::new(
            self.config.report_dir.clone(),
            self.config.report_filename.clone(),
        );

        tokio::spawn(async move {
            let outcome = run_effect(gateway.as_ref(), effect, &clock, writer);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                msg = outcome => {
                    let _ = results.send(msg);
                }
            }
        });
    }
}

async fn run_effect(
    gateway: &dyn ApiGateway,
    effect: Effect,
    clock: &Clock,
    writer: ReportWriter,
) -> Msg {
    match effect {
        Effect::FetchStatus { seq } => {
            let result = gateway.status().await;
            Msg::StatusPolled {
                seq,
                result,
                at: clock(),
            }
        }
        Effect::FetchStats => Msg::StatsFetched(gateway.stats().await),
        Effect::FetchRecentJobs { limit } => Msg::JobsFetched(gateway.recent_jobs(limit).await),
        Effect::SubmitSearch { filters } => {
            let result = gateway.submit_search(&filters).await;
            Msg::LaunchResolved {
                result,
                at: clock(),
            }
        }
        Effect::DownloadReport => {
            let result = save_report(gateway, writer).await;
            Msg::ReportSaved {
                result,
                at: clock(),
            }
        }
    }
}

async fn save_report(gateway: &dyn ApiGateway, writer: ReportWriter) -> Result<PathBuf, String> {
    let bytes = gateway
        .download_report()
        .await
        .map_err(|err| err.to_string())?;
    let written = tokio::task::spawn_blocking(move || writer.save(&bytes))
        .await
        .map_err(|err| err.to_string())?;
    match written {
        Ok(path) => {
            mission_info!("Report written to {:?}", path);
            Ok(path)
        }
        Err(err) => Err(err.to_string()),
    }
}
