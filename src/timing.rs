//! Elapsed-time reporting for external tool runs.

use std::time::Instant;

/// A simple timer for measuring how long a step took.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer with the given step name.
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Finish the timer and log the elapsed time.
    pub fn finish(self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if secs >= 60.0 {
            tracing::info!(step = %self.name, "finished in {:.1}m", secs / 60.0);
        } else {
            tracing::info!(step = %self.name, "finished in {:.1}s", secs);
        }
        secs
    }
}
