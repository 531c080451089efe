//! Run state
//!
//! The only state a run carries is when it started. It is captured once at
//! process entry and handed to the summary explicitly.

pub mod paths;

pub use paths::HostPaths;

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Timing for a single maintenance run
#[derive(Debug, Clone, Copy)]
pub struct RunSession {
    started: Instant,
    started_at: DateTime<Local>,
}

impl RunSession {
    /// Start a session now
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            started_at: Local::now(),
        }
    }

    /// Start a session at a given instant (useful for testing)
    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            started_at: Local::now(),
        }
    }

    /// Wall-clock start time
    pub fn start_time(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Time elapsed between the session start and `now`
    pub fn elapsed_until(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Time elapsed since the session started
    pub fn elapsed(&self) -> Duration {
        self.elapsed_until(Instant::now())
    }
}

/// Elapsed run time in the two forms the summary prints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elapsed {
    pub seconds: u64,
}

impl Elapsed {
    pub fn new(duration: Duration) -> Self {
        Self {
            seconds: duration.as_secs(),
        }
    }

    /// `125 seconds`
    pub fn as_seconds(&self) -> String {
        format!("{} seconds", self.seconds)
    }

    /// `2 min 5 sec`
    pub fn as_minutes(&self) -> String {
        format!("{} min {} sec", self.seconds / 60, self.seconds % 60)
    }
}
