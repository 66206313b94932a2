use std::time::{Duration, Instant};

/// Tracks completed items against elapsed time
///
/// Owned by a single task; the count only ever grows.
#[derive(Debug, Clone)]
pub struct RateCalculator {
    started: Instant,
    completed: u64,
}

impl Default for RateCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl RateCalculator {
    /// Starts the clock now
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            completed: 0,
        }
    }

    /// Counts one more completed item and returns the new total
    pub fn record_completion(&mut self) -> u64 {
        self.completed += 1;
        self.completed
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Completed items per minute so far
    pub fn rate(&self) -> f64 {
        self.rate_at(Instant::now())
    }

    /// Completed items per minute as of `now`
    ///
    /// Returns 0.0 when no time has elapsed.
    pub fn rate_at(&self, now: Instant) -> f64 {
        let minutes = now.saturating_duration_since(self.started).as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }
        self.completed as f64 / minutes
    }
}
