use crate::Status;

/// Sequence number attached to every status request, starting at 1.
pub type RequestSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Active,
}

/// What changed when a status response was admitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Observation {
    /// The previous held status was active and the new one is not.
    pub just_completed: bool,
    /// Set when the agent is active and its message differs from the held one.
    pub new_message: Option<String>,
    /// The new status is the agent's resting state.
    pub reports_idle: bool,
    pub now_active: bool,
}

/// Tracks the latest admitted status and the request sequence.
///
/// A response is admitted only when its sequence number is newer than every
/// response admitted before it; an older reply that finishes late is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSynchronizer {
    held: Status,
    last_issued: RequestSeq,
    last_admitted: RequestSeq,
    completions: u64,
}

impl StatusSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> &Status {
        &self.held
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.held.active {
            Lifecycle::Active
        } else {
            Lifecycle::Idle
        }
    }

    /// Reserves the sequence number for a new status request.
    pub fn issue(&mut self) -> RequestSeq {
        self.last_issued += 1;
        self.last_issued
    }

    pub fn last_issued(&self) -> RequestSeq {
        self.last_issued
    }

    pub fn last_admitted(&self) -> RequestSeq {
        self.last_admitted
    }

    /// Number of active→idle edges seen so far.
    pub fn completions(&self) -> u64 {
        self.completions
    }

    /// Applies `next` only if `seq` answers the most recently issued poll.
    ///
    /// Returns `None` for superseded, repeated or never-issued sequence
    /// numbers, leaving the held status untouched.
    pub fn admit(&mut self, seq: RequestSeq, next: Status) -> Option<Observation> {
        if seq != self.last_issued || seq <= self.last_admitted {
            return None;
        }
        self.last_admitted = seq;

        let previous = std::mem::replace(&mut self.held, next);
        let held = &self.held;

        let just_completed = previous.active && !held.active;
        if just_completed {
            self.completions += 1;
        }
        let new_message =
            (held.active && held.message != previous.message).then(|| held.message.clone());

        Some(Observation {
            just_completed,
            new_message,
            reports_idle: held.is_reporting_idle(),
            now_active: held.active,
        })
    }
}
