/// Worker state definitions for tracking crawl progress
///
/// Each worker cycles through these phases once per address it handles.
use std::fmt;

/// Represents what a worker is doing right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Waiting for an address from the frontier
    #[default]
    Idle,

    /// Request in flight
    Fetching,

    /// Writing the raw markup and extracted text
    Persisting,

    /// Discovering links in the fetched page
    Extracting,

    /// Admitting discovered links and updating counters
    Enqueuing,

    /// Exited after the pool-wide stop condition held
    Stopped,
}

impl WorkerState {
    /// Returns true if the worker will not take any more work
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Checks whether moving from `self` to `next` is part of the cycle
    ///
    /// Fetching may return straight to Idle when the page fails or is not
    /// HTML, and any busy phase may return to Idle on a per-page error.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        use WorkerState::*;

        match (self, next) {
            (Idle, Fetching) | (Idle, Stopped) => true,
            (Fetching, Persisting) => true,
            (Persisting, Extracting) => true,
            (Extracting, Enqueuing) => true,
            (Enqueuing, Idle) => true,
            (Fetching | Persisting | Extracting, Idle) => true,
            _ => false,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Persisting => "persisting",
            Self::Extracting => "extracting",
            Self::Enqueuing => "enqueuing",
            Self::Stopped => "stopped",
        };
        write!(f, "{}", name)
    }
}
