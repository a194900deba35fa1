use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Message the agent reports when it has nothing to do.
pub const IDLE_MESSAGE: &str = "Idle";

/// Snapshot of the agent as reported by one status poll.
///
/// Always replaced wholesale; never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub active: bool,
    pub progress: u8,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub job_count: u64,
    pub ready_to_download: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub current_role: String,
    pub filters: Option<FilterSnapshot>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            active: false,
            progress: 0,
            message: IDLE_MESSAGE.to_string(),
            job_count: 0,
            ready_to_download: false,
            current_role: String::new(),
            filters: None,
        }
    }
}

impl Status {
    /// True for the agent's resting state: inactive and reporting "Idle".
    pub fn is_reporting_idle(&self) -> bool {
        !self.active && self.message == IDLE_MESSAGE
    }

    /// Checks the invariants a well-formed status payload must satisfy.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.progress > 100 {
            return Err(ApiError::Protocol(format!(
                "progress out of range: {}",
                self.progress
            )));
        }
        if self.ready_to_download && self.active {
            return Err(ApiError::Protocol(
                "status reports a downloadable report while still active".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filters echoed back by the agent for the running mission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSnapshot {
    pub roles: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
}

/// Aggregate counters kept by the agent's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_jobs: u64,
    pub total_scans: u64,
}

/// A job lead persisted by the agent. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    /// Newline-joined addresses, empty when none were found.
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Job {
    pub fn email_list(&self) -> Vec<&str> {
        self.emails
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Language strictness applied by the agent when filtering postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    German,
    French,
    Spanish,
    Italian,
    All,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::German,
        Language::French,
        Language::Spanish,
        Language::Italian,
        Language::All,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::All => "All",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::All => "all",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts either the name or the two-letter code, case-insensitively.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(raw) || lang.code().eq_ignore_ascii_case(raw))
            .ok_or_else(|| format!("unknown language: {raw}"))
    }
}

/// Answer of the agent to a launch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub accepted: bool,
    pub error: Option<String>,
}

impl SubmitOutcome {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            error: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            error: Some(reason.into()),
        }
    }

    /// Folds a rejection into [`ApiError::Application`].
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.accepted {
            Ok(())
        } else {
            Err(ApiError::Application(
                self.error
                    .unwrap_or_else(|| "launch rejected by agent".to_string()),
            ))
        }
    }
}

/// Failure of a call to the agent API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never reached the agent or the reply never came back.
    #[error("network error: {0}")]
    Network(String),
    /// A reply arrived but was not what the contract promises.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// A well-formed reply carrying a business-level rejection.
    #[error("{0}")]
    Application(String),
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
