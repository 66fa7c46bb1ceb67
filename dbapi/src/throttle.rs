//! Fixed-spacing rate throttle.
//!
//! The throttle enforces a minimum gap between successive outbound calls.
//! It is not a token bucket: apart from the very first call, which is let
//! through immediately, no two calls are released closer together than the
//! configured interval.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Nanoseconds in one minute.
const NANOS_PER_MINUTE: u64 = 60_000_000_000;

/// Rate throttle for one sub-API, selected once at configuration time.
#[derive(Debug)]
pub enum Throttle {
    /// Rate limiting disabled; `wait` never suspends.
    Unlimited,
    /// Fixed interval between releases.
    Interval(IntervalThrottle),
}

impl Throttle {
    /// Build a throttle allowing `calls_per_minute` calls per minute.
    ///
    /// Zero disables rate limiting.
    pub fn per_minute(calls_per_minute: u32) -> Self {
        if calls_per_minute == 0 {
            return Throttle::Unlimited;
        }
        let interval = Duration::from_nanos(NANOS_PER_MINUTE / u64::from(calls_per_minute));
        Throttle::Interval(IntervalThrottle::new(interval))
    }

    /// Wait until the next call may be released.
    pub async fn wait(&self) {
        match self {
            Throttle::Unlimited => {}
            Throttle::Interval(throttle) => throttle.wait().await,
        }
    }

    /// The enforced spacing, or `None` when disabled.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Throttle::Unlimited => None,
            Throttle::Interval(throttle) => Some(throttle.interval),
        }
    }

    /// Whether calls are throttled at all.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Throttle::Interval(_))
    }
}

/// Throttle that releases at most one caller per interval.
#[derive(Debug)]
pub struct IntervalThrottle {
    interval: Duration,
    /// When the previous `wait` returned; `None` until the first release.
    last_release: Mutex<Option<Instant>>,
}

impl IntervalThrottle {
    /// Create a throttle releasing one caller per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_release: Mutex::new(None),
        }
    }

    /// Wait until `interval` has passed since the previous release.
    ///
    /// The lock is held across the sleep, so concurrent callers queue up and
    /// are released one interval apart.
    pub async fn wait(&self) {
        let mut last_release = self.last_release.lock().await;
        if let Some(previous) = *last_release {
            let deadline = previous + self.interval;
            let now = Instant::now();
            if deadline > now {
                trace!(wait_ms = (deadline - now).as_millis() as u64, "throttling request");
                tokio::time::sleep_until(deadline).await;
            }
        }
        *last_release = Some(Instant::now());
    }

    /// The enforced spacing.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn zero_rate_is_unlimited() {
        let throttle = Throttle::per_minute(0);
        assert!(!throttle.is_enabled());
        assert_eq!(throttle.interval(), None);
    }

    #[test]
    fn interval_from_rate() {
        assert_eq!(
            Throttle::per_minute(20).interval(),
            Some(Duration::from_secs(3))
        );
        assert_eq!(
            Throttle::per_minute(60).interval(),
            Some(Duration::from_secs(1))
        );
        assert_eq!(
            Throttle::per_minute(7).interval(),
            Some(Duration::from_nanos(8_571_428_571))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn first_wait_is_immediate() {
        let throttle = Throttle::per_minute(1);
        let start = Instant::now();
        throttle.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn subsequent_waits_are_spaced() {
        let throttle = Throttle::per_minute(20);
        throttle.wait().await;

        let mut previous = Instant::now();
        for _ in 0..4 {
            throttle.wait().await;
            let released = Instant::now();
            assert!(released - previous >= Duration::from_secs(3));
            previous = released;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn spacing_measured_from_previous_release() {
        let throttle = Throttle::per_minute(60);
        throttle.wait().await;

        // Caller is busy for most of the interval; only the rest is waited.
        tokio::time::sleep(Duration::from_millis(700)).await;
        let start = Instant::now();
        throttle.wait().await;
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(300));
        assert!(waited < Duration::from_millis(310));

        // Caller idles past the interval; no wait at all.
        tokio::time::sleep(Duration::from_secs(5)).await;
        let start = Instant::now();
        throttle.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn unlimited_never_waits() {
        let throttle = Throttle::per_minute(0);
        let start = Instant::now();
        for _ in 0..100 {
            throttle.wait().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_get_one_release_per_interval() {
        let throttle = Arc::new(Throttle::per_minute(30));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let throttle = Arc::clone(&throttle);
                tokio::spawn(async move {
                    throttle.wait().await;
                    Instant::now()
                })
            })
            .collect();

        let mut releases = Vec::new();
        for handle in handles {
            releases.push(handle.await.unwrap());
        }
        releases.sort();

        assert_eq!(releases[0], start);
        for pair in releases.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(2));
        }
    }
}
