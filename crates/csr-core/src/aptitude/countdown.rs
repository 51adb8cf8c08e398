//! Test countdown.
//!
//! Wall-clock based, no internal threads: the caller invokes `tick()`
//! about once a second and the countdown flushes the real elapsed time.
//! Expiry fires exactly once; a cancelled countdown never fires.

use serde::{Deserialize, Serialize};

/// Countdown over a fixed budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    /// Remaining time in milliseconds.
    remaining_ms: u64,
    /// Timestamp (ms since epoch) of the last flush.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    #[serde(default)]
    cancelled: bool,
}

impl Countdown {
    /// Start a countdown over `budget_secs` seconds, running immediately.
    pub fn start(budget_secs: u64) -> Self {
        Self {
            remaining_ms: budget_secs.saturating_mul(1000),
            last_tick_epoch_ms: Some(now_ms()),
            cancelled: false,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms / 1000
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Flush elapsed wall-clock time. Returns `true` exactly once, when the
    /// budget is exhausted; the countdown cancels itself at that point so a
    /// late tick can never fire a second expiry.
    pub fn tick(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.flush_elapsed();
        if self.remaining_ms == 0 {
            self.cancel();
            return true;
        }
        false
    }

    /// Stop the countdown. Used when the test finalizes through any other
    /// path, so a pending expiry cannot fire a duplicate finalize.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.last_tick_epoch_ms = None;
    }

    fn flush_elapsed(&mut self) {
        if let Some(last) = self.last_tick_epoch_ms {
            let now = now_ms();
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now);
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
