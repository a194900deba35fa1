use crate::{FilterModel, Observation, Status};

pub const LAUNCH_ANNOUNCEMENT: &str = "Initializing agent clusters...";
pub const LAUNCH_ACCEPTED: &str = "Search mission launched successfully";
pub const LAUNCH_UNREACHABLE: &str = "Failed to establish connection with agent";

/// Local reasons to refuse a launch without contacting the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LaunchRejection {
    #[error("Search already in progress")]
    AlreadyActive,
    #[error("Launch already pending")]
    AlreadyLaunching,
    #[error("Select at least one role before launching")]
    NoRoles,
}

/// Owns the "launching" indicator between a launch request and the poll that
/// confirms it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchLauncher {
    launching: bool,
}

impl SearchLauncher {
    pub fn is_launching(&self) -> bool {
        self.launching
    }

    /// Validates a launch against the held status and returns the filters to
    /// submit. Sets the launching indicator on success only.
    pub fn begin(
        &mut self,
        held: &Status,
        filters: &FilterModel,
    ) -> Result<FilterModel, LaunchRejection> {
        if held.active {
            return Err(LaunchRejection::AlreadyActive);
        }
        if self.launching {
            return Err(LaunchRejection::AlreadyLaunching);
        }
        if !filters.has_roles() {
            return Err(LaunchRejection::NoRoles);
        }
        self.launching = true;
        Ok(filters.clone())
    }

    /// The agent refused or could not be reached.
    pub fn abort(&mut self) {
        self.launching = false;
    }

    /// Clears the indicator once a poll shows the agent running, idle or done.
    pub fn observe(&mut self, observation: &Observation) {
        if observation.now_active || observation.reports_idle || observation.just_completed {
            self.launching = false;
        }
    }
}
