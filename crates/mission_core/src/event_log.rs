use std::collections::VecDeque;

pub const DEFAULT_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Error,
    System,
}

/// One line of the mission event log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    time: String,
    message: String,
    severity: Severity,
}

impl LogEntry {
    pub fn new(time: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            time: time.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// Append-only event buffer that evicts the oldest entry once full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogAggregator {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    appended: u64,
}

impl Default for LogAggregator {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl LogAggregator {
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            appended: 0,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.appended += 1;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries ever appended, evicted ones included.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}
