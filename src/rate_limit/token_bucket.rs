//! Token bucket rate limiter.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// A token bucket holding a capped number of permits that refill at a fixed
/// rate.
///
/// Refills are computed lazily on access: the number of whole intervals
/// elapsed since the last refill is added to the token count, capped at
/// capacity. The entire refill-decide-consume sequence runs under a single
/// mutex; the blocking wait in [`acquire`](TokenBucket::acquire) releases the
/// lock while sleeping so other tasks are not stalled.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    interval: Duration,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a bucket holding `capacity` tokens refilling every `interval`.
    ///
    /// The bucket starts full.
    pub fn new(capacity: u32, interval: Duration) -> Self {
        // A zero interval would divide by zero in the refill computation.
        let interval = interval.max(Duration::from_nanos(1));
        Self {
            capacity,
            interval,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// The maximum number of tokens this bucket can hold.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Attempt to consume a token without waiting.
    ///
    /// Returns `true` if a token was immediately available.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        self.refill(&mut state);
        if state.tokens == 0 {
            return false;
        }
        state.tokens -= 1;
        true
    }

    /// The number of tokens currently available.
    pub fn remaining(&self) -> u32 {
        let mut state = self.state.lock();
        self.refill(&mut state);
        state.tokens
    }

    /// Wait until a token is available, then consume it.
    ///
    /// Sleeps to the next refill boundary with the lock released, and re-runs
    /// the full refill computation after waking, so a token granted here is
    /// never in excess of the configured rate. Cancel-safe: dropping the
    /// future abandons the wait without consuming a token.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock();
                self.refill(&mut state);
                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }
                self.until_next_refill(&state)
            };
            tokio::time::sleep(wait).await;
        }
    }

    /// [`acquire`](TokenBucket::acquire) bounded by a deadline.
    ///
    /// Returns `true` if a token was consumed within `limit`, `false` if the
    /// deadline expired first.
    pub async fn acquire_timeout(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.acquire()).await.is_ok()
    }

    /// Add one token per whole interval elapsed since the last refill, capped
    /// at capacity.
    fn refill(&self, state: &mut BucketState) {
        let elapsed = state.last_refill.elapsed();
        if elapsed >= self.interval {
            let periods = u32::try_from(elapsed.as_nanos() / self.interval.as_nanos())
                .unwrap_or(u32::MAX);
            state.tokens = state.tokens.saturating_add(periods).min(self.capacity);
            state.last_refill = Instant::now();
        }
    }

    /// Time remaining until the next refill boundary.
    fn until_next_refill(&self, state: &BucketState) -> Duration {
        let elapsed = state.last_refill.elapsed();
        let rem = elapsed.as_nanos() % self.interval.as_nanos();
        self.interval - Duration::from_nanos(rem as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn try_acquire_up_to_capacity() {
        let bucket = TokenBucket::new(3, Duration::from_secs(1));

        for i in 0..3 {
            assert!(bucket.try_acquire(), "acquisition {} should succeed", i + 1);
        }
        assert!(!bucket.try_acquire(), "acquisition beyond capacity should fail");
    }

    #[tokio::test(start_paused = true)]
    async fn refills_one_token_per_interval() {
        let bucket = TokenBucket::new(5, Duration::from_secs(1));
        while bucket.try_acquire() {}

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(bucket.remaining(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refill_is_capped_at_capacity() {
        let bucket = TokenBucket::new(3, Duration::from_secs(1));

        // Arbitrarily long idle must never push the count over capacity.
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(bucket.remaining(), 3);
        for _ in 0..3 {
            assert!(bucket.try_acquire());
        }
        assert!(!bucket.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_blocks_until_refill() {
        let bucket = TokenBucket::new(1, Duration::from_secs(10));
        bucket.acquire().await;

        let start = Instant::now();
        bucket.acquire().await;
        let waited = start.elapsed();

        assert!(waited >= Duration::from_secs(10), "waited {waited:?}");
        assert!(waited < Duration::from_secs(11), "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_recomputes_refill_after_waking() {
        let bucket = TokenBucket::new(2, Duration::from_secs(1));
        bucket.acquire().await;
        bucket.acquire().await;

        // One interval grants exactly one token, consumed by the waiter; the
        // bucket must be empty again immediately afterwards.
        bucket.acquire().await;
        assert_eq!(bucket.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_timeout_expires_when_exhausted() {
        let bucket = TokenBucket::new(1, Duration::from_secs(10));
        bucket.acquire().await;

        assert!(!bucket.acquire_timeout(Duration::from_secs(1)).await);
        // The failed wait must not have consumed anything once refilled.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(bucket.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_waiters_each_get_one_token() {
        use std::sync::Arc;

        let bucket = Arc::new(TokenBucket::new(1, Duration::from_secs(1)));
        bucket.acquire().await;

        let mut handles = Vec::new();
        for _ in 0..3 {
            let bucket = bucket.clone();
            handles.push(tokio::spawn(async move {
                bucket.acquire().await;
                Instant::now()
            }));
        }

        let mut completions = Vec::new();
        for handle in handles {
            completions.push(handle.await.unwrap());
        }
        completions.sort();

        // One token per interval: the three waiters drain over three
        // successive boundaries rather than all at once.
        assert!(completions[2] - completions[0] >= Duration::from_secs(2));
    }
}
