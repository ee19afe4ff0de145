//! Client-side call limiting for exchanges that ban bursty clients.
//!
//! Uses a `governor` cell rate limiter with a burst of one behind a FIFO
//! mutex: admissions are spaced `period / max_calls` apart, so no window of
//! length `period` ever holds more than `max_calls` calls. Callers queue up
//! in arrival order and wait for a slot instead of failing.

use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Maximum number of calls per period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_calls: NonZeroU32,
    pub period: Duration,
}

impl RateLimit {
    pub const fn per_second(max_calls: NonZeroU32) -> Self {
        Self {
            max_calls,
            period: Duration::from_secs(1),
        }
    }

    /// Minimum spacing between two admissions
    pub fn interval(&self) -> Duration {
        self.period / self.max_calls.get()
    }

    // Burst of one: any window of `period` holds at most `max_calls` admissions
    fn quota(&self) -> Quota {
        Quota::with_period(self.interval())
            .unwrap_or_else(|| Quota::per_second(self.max_calls))
            .allow_burst(nonzero!(1u32))
    }
}

/// Blocking admission gate shared by all calls on one adapter
#[derive(Clone)]
pub struct CallLimiter {
    exchange_name: String,
    limit: RateLimit,
    limiter: Arc<Limiter>,
    admission: Arc<Mutex<()>>,
}

impl std::fmt::Debug for CallLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallLimiter")
            .field("exchange_name", &self.exchange_name)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl CallLimiter {
    pub fn new(exchange_name: &str, limit: RateLimit) -> Self {
        Self {
            exchange_name: exchange_name.to_string(),
            limit,
            limiter: Arc::new(RateLimiter::direct(limit.quota())),
            admission: Arc::new(Mutex::new(())),
        }
    }

    pub const fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Wait until a call may be made. Never fails and never reorders callers.
    pub async fn acquire(&self) {
        let _turn = self.admission.lock().await;

        match self.limiter.check() {
            Ok(()) => debug!(exchange = %self.exchange_name, "Call admitted"),
            Err(not_until) => {
                let wait = not_until.wait_time_from(DefaultClock::default().now());
                info!(
                    exchange = %self.exchange_name,
                    wait_ms = wait.as_millis() as u64,
                    "{} call rate limited, sleeping for {:.1}s",
                    self.exchange_name,
                    wait.as_secs_f64()
                );
                self.limiter.until_ready().await;
            }
        }
    }
}
