/// CoinGecko public API rate limiter - 10 requests per minute globally
use lazy_static::lazy_static;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

lazy_static! {
    static ref COINGECKO_RATE_LIMITER: Mutex<SlidingWindowLimiter> =
        Mutex::new(SlidingWindowLimiter::new(10, Duration::from_secs(60)));
}

pub struct SlidingWindowLimiter {
    /// Queue of request timestamps inside the window
    request_times: VecDeque<Instant>,
    /// Max requests per window
    max_requests: usize,
    window: Duration,
}

impl SlidingWindowLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            request_times: VecDeque::new(),
            max_requests,
            window,
        }
    }

    fn check_and_record(&mut self) -> Duration {
        let now = Instant::now();

        // Drop timestamps that have left the window
        while let Some(&front) = self.request_times.front() {
            if now.duration_since(front) > self.window {
                self.request_times.pop_front();
            } else {
                break;
            }
        }

        // At the limit: wait until the oldest request leaves the window
        if self.request_times.len() >= self.max_requests {
            if let Some(&oldest) = self.request_times.front() {
                let elapsed = now.duration_since(oldest);
                if elapsed < self.window {
                    return self.window - elapsed;
                }
            }
        }

        self.request_times.push_back(now);
        Duration::from_secs(0)
    }
}

/// Wait if necessary to stay under the public CoinGecko request budget
pub async fn rate_limit_coingecko() {
    let wait_duration = {
        let mut limiter = COINGECKO_RATE_LIMITER.lock().unwrap();
        limiter.check_and_record()
    };

    if wait_duration.as_millis() > 0 {
        tracing::debug!(
            "CoinGecko rate limit: waiting {}ms",
            wait_duration.as_millis()
        );
        tokio::time::sleep(wait_duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_requests_within_limit() {
        let mut limiter = SlidingWindowLimiter::new(10, Duration::from_secs(60));

        for _ in 0..10 {
            let wait = limiter.check_and_record();
            assert_eq!(wait.as_millis(), 0);
        }
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let mut limiter = SlidingWindowLimiter::new(10, Duration::from_secs(60));

        for _ in 0..10 {
            limiter.check_and_record();
        }

        // 11th request must wait out the window
        let wait = limiter.check_and_record();
        assert!(wait.as_millis() > 0);
    }
}
