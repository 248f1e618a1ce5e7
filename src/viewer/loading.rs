//! Loading indicator with a UX-only timeout.
//!
//! An asset load that exceeds the wall-clock budget has its indicator
//! dismissed so the UI never blocks permanently, but the underlying
//! transfer is NOT cancelled — a late completion still lands normally.

/// Wall-clock budget before the indicator is force-dismissed.
pub const LOADING_TIMEOUT_SECS: f64 = 12.0;

#[derive(Debug, Default)]
pub struct LoadingIndicator {
    /// Timestamp the current load started at, while one is in flight.
    started_at: Option<f64>,
}

impl LoadingIndicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the indicator for a load starting at `now`.
    pub fn begin(&mut self, now: f64) {
        self.started_at = Some(now);
    }

    /// Hides the indicator (load finished or failed).
    pub fn finish(&mut self) {
        self.started_at = None;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.started_at.is_some()
    }

    /// Checks the budget. On expiry the indicator is dismissed and `true`
    /// is returned exactly once; the load itself keeps running.
    pub fn check_timeout(&mut self, now: f64) -> bool {
        match self.started_at {
            Some(started) if now - started >= LOADING_TIMEOUT_SECS => {
                log::warn!("Loading timeout reached; dismissing indicator");
                self.started_at = None;
                true
            }
            _ => false,
        }
    }
}
