use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Strictly increasing per-credential token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(u64);

impl Nonce {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clock resolution of the nonce, in ticks per second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceScale {
    Millis,
    /// 10^7 ticks per second; leaves headroom over microsecond nonces
    /// already issued for the same key elsewhere.
    TenMillionths,
}

impl NonceScale {
    const fn ticks_per_second(self) -> u128 {
        match self {
            Self::Millis => 1_000,
            Self::TenMillionths => 10_000_000,
        }
    }
}

/// Time-derived nonce source for one credential.
///
/// Each issued value is at least one greater than the previous one even when
/// the clock has not advanced, so concurrent callers never collide.
#[derive(Debug)]
pub struct NonceGenerator {
    scale: NonceScale,
    last: AtomicU64,
}

impl NonceGenerator {
    pub const fn new(scale: NonceScale) -> Self {
        Self {
            scale,
            last: AtomicU64::new(0),
        }
    }

    pub const fn scale(&self) -> NonceScale {
        self.scale
    }

    fn now_ticks(&self) -> u64 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        (nanos * self.scale.ticks_per_second() / 1_000_000_000) as u64
    }

    /// Next nonce, shifted up by `increment` (used when re-signing after a rejection).
    pub fn next(&self, increment: u64) -> Nonce {
        let now = self.now_ticks();
        let mut issued = 0;
        // fetch_update only errs when the closure returns None
        let _ = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                issued = now.max(last + 1) + increment;
                Some(issued)
            });
        Nonce(issued)
    }
}

/// Bounded re-sign protocol for exchanges that reject stale nonces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceRejection {
    /// Error messages that mean "nonce too small"
    pub messages: Vec<String>,
    /// Total attempts, the first one included
    pub max_attempts: u32,
}

impl NonceRejection {
    pub fn new<I, S>(messages: I, max_attempts: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn matches(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }
}
