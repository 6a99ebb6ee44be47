//! Injectable time source for the confirmation poll.
//!
//! The polling loop never touches wall-clock APIs directly, so tests can
//! drive it with a manual clock and exhaust a three-minute deadline without
//! waiting.

use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Time and sleep primitive used by the confirmation poll
#[async_trait]
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since an arbitrary fixed origin
    fn now_millis(&self) -> u64;

    /// Suspends the caller for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by `tokio::time`
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Manual clock: `sleep` advances time instantly
    #[derive(Default)]
    pub struct ManualClock {
        now: AtomicU64,
    }

    #[async_trait]
    impl Clock for ManualClock {
        fn now_millis(&self) -> u64 {
            self.now.load(Ordering::SeqCst)
        }

        async fn sleep(&self, duration: Duration) {
            self.now
                .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_advances_on_sleep() {
        let clock = ManualClock::default();
        assert_eq!(clock.now_millis(), 0);
        clock.sleep(Duration::from_secs(5)).await;
        clock.sleep(Duration::from_secs(5)).await;
        assert_eq!(clock.now_millis(), 10_000);
    }

    #[tokio::test]
    async fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let before = clock.now_millis();
        clock.sleep(Duration::from_millis(5)).await;
        assert!(clock.now_millis() >= before);
    }
}
