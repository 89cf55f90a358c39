//! Request pacing for external sources.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Duration, Instant};

/// Minimum-interval request throttle.
///
/// Each call to [`acquire`](Self::acquire) reserves the next free slot and
/// sleeps until it arrives. The lock is only held while reserving, so many
/// callers can wait concurrently while still being released one interval
/// apart. Clones share the same schedule.
#[derive(Debug, Clone)]
pub struct Throttle {
    next_slot: Arc<Mutex<Option<Instant>>>,
    interval: Duration,
}

impl Throttle {
    /// Creates a throttle that releases at most `requests_per_second`
    /// callers per second. Zero is treated as one.
    pub fn new(requests_per_second: u32) -> Self {
        let rps = u64::from(requests_per_second.max(1));
        Self {
            next_slot: Arc::new(Mutex::new(None)),
            interval: Duration::from_millis(1000 / rps),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for this caller's slot.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next.map_or(now, |reserved| reserved.max(now));
            *next = Some(slot + self.interval);
            slot
        };
        sleep_until(slot).await;
    }
}
