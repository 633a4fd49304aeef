//! Trailing-debounce timer behind implicit saves.
//!
//! Arm it on every document change; it becomes ready once the delay has
//! elapsed since the *last* arm. At most one fire is pending at a time, and
//! re-arming supersedes the pending fire.

/// Default delay between the last edit and the implicit save.
pub const DEFAULT_DELAY_MS: u64 = 5000;

#[derive(Debug)]
pub struct AutosaveTimer {
    delay_ms: u64,
    armed_at: Option<u64>,
}

impl AutosaveTimer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            armed_at: None,
        }
    }

    /// Start (or restart) the countdown from `now_ms`.
    pub const fn arm(&mut self, now_ms: u64) {
        self.armed_at = Some(now_ms);
    }

    /// Drop any pending fire, e.g. after an explicit save.
    pub const fn cancel(&mut self) {
        self.armed_at = None;
    }

    /// Consume the pending fire if the delay has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(armed_at) = self.armed_at else {
            return false;
        };
        if now_ms.saturating_sub(armed_at) >= self.delay_ms {
            self.armed_at = None;
            true
        } else {
            false
        }
    }

    pub const fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }
}
