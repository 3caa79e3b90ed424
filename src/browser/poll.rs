//! Fixed-interval polling with an explicit outcome.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Result of a bounded poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The predicate produced a value before attempts ran out.
    Completed(T),
    /// All attempts were used up.
    TimedOut,
}

impl<T> PollOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, PollOutcome::Completed(_))
    }
}

/// Run `check` up to `max_attempts` times, `delay` apart, until it returns
/// `Some`. The delay is skipped after the final attempt.
pub async fn poll_until<T, F, Fut>(max_attempts: u32, delay: Duration, mut check: F) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 0..max_attempts {
        if let Some(value) = check().await {
            return PollOutcome::Completed(value);
        }
        if attempt + 1 < max_attempts {
            sleep(delay).await;
        }
    }
    PollOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn completes_on_first_success() {
        let outcome = poll_until(5, Duration::from_millis(1), || async { Some(42) }).await;
        assert_eq!(outcome, PollOutcome::Completed(42));
    }

    #[tokio::test]
    async fn completes_on_later_attempt() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until(5, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { (n >= 2).then_some(n) }
        })
        .await;

        assert_eq!(outcome, PollOutcome::Completed(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn times_out_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let outcome: PollOutcome<()> = poll_until(4, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { None }
        })
        .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn zero_attempts_times_out() {
        let outcome: PollOutcome<()> =
            poll_until(0, Duration::from_millis(1), || async { Some(()) }).await;
        assert_eq!(outcome, PollOutcome::TimedOut);
    }
}
