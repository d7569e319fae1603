//! Capped exponential backoff for reconnection.

use std::time::Duration;

/// Delay before the next reconnect attempt after `attempt` failures.
///
/// Attempt 1 waits `base_ms`, every further failure doubles it, never past `max_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);

    Duration::from_millis(delay_ms.min(max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        assert_eq!(calculate_backoff(0, 10, 3000), Duration::ZERO);
        assert_eq!(calculate_backoff(1, 10, 3000), Duration::from_millis(10));
        assert_eq!(calculate_backoff(2, 10, 3000), Duration::from_millis(20));
        assert_eq!(calculate_backoff(3, 10, 3000), Duration::from_millis(40));
        assert_eq!(calculate_backoff(9, 10, 3000), Duration::from_millis(2560));
        assert_eq!(calculate_backoff(10, 10, 3000), Duration::from_millis(3000));
    }

    #[test]
    fn test_backoff_never_exceeds_cap() {
        let mut previous = Duration::ZERO;
        for attempt in 1..200 {
            let delay = calculate_backoff(attempt, 10, 3000);
            assert!(delay <= Duration::from_millis(3000));
            assert!(delay >= previous);
            previous = delay;
        }
        assert_eq!(previous, Duration::from_millis(3000));
    }
}
