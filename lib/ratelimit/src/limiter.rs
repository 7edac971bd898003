//! The sliding-window limiter.

use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Invalid rate limit settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroMaxRequests,
    ZeroWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxRequests => write!(f, "max_requests must be greater than zero"),
            Self::ZeroWindow => write!(f, "window_seconds must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Rate limit configuration. Both values are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct RateLimitConfig {
    max_requests: u32,
    window_seconds: u32,
}

#[derive(Deserialize)]
struct RawConfig {
    max_requests: u32,
    window_seconds: u32,
}

impl TryFrom<RawConfig> for RateLimitConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        Self::new(raw.max_requests, raw.window_seconds)
    }
}

impl RateLimitConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is zero.
    pub fn new(max_requests: u32, window_seconds: u32) -> Result<Self, ConfigError> {
        if max_requests == 0 {
            return Err(ConfigError::ZeroMaxRequests);
        }
        if window_seconds == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(Self {
            max_requests,
            window_seconds,
        })
    }

    #[must_use]
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    #[must_use]
    pub fn window_seconds(&self) -> u32 {
        self.window_seconds
    }

    fn window(&self) -> Duration {
        Duration::seconds(i64::from(self.window_seconds))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window_seconds: 60,
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request was admitted and recorded.
    Allowed { remaining: u32 },
    /// The request was refused; nothing was recorded.
    Rejected {
        remaining: u32,
        /// Time until the oldest in-window admit expires.
        retry_after: std::time::Duration,
    },
}

impl Admission {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Admit timestamps for one client, oldest first.
type Window = VecDeque<DateTime<Utc>>;

fn prune(window: &mut Window, now: DateTime<Utc>, span: Duration) {
    while window.front().is_some_and(|&ts| now - ts >= span) {
        window.pop_front();
    }
}

fn live_count(window: &Window, now: DateTime<Utc>, span: Duration) -> usize {
    window.iter().filter(|&&ts| now - ts < span).count()
}

/// A per-client sliding-window rate limiter.
///
/// Every client identity, including the empty string, gets its own bucket.
/// Clones share state, so one limiter can be handed to every request.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    state: Arc<RwLock<HashMap<String, Window>>>,
}

impl RateLimiter {
    /// Creates a limiter on the system clock.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Admits `client_id` if it has quota left, recording the request.
    pub fn admit(&self, client_id: &str) -> bool {
        self.check_and_record(client_id).is_allowed()
    }

    /// Like [`admit`](Self::admit), but also reports remaining quota and,
    /// on rejection, how long until a slot frees up.
    pub fn check_and_record(&self, client_id: &str) -> Admission {
        let now = self.clock.now();
        let span = self.config.window();
        let max = self.config.max_requests as usize;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let window = state.entry(client_id.to_string()).or_default();
        prune(window, now, span);

        if window.len() < max {
            window.push_back(now);
            return Admission::Allowed {
                remaining: remaining_of(max, window.len()),
            };
        }

        let retry_after = window
            .front()
            .map(|&oldest| oldest + span - now)
            .and_then(|d| d.to_std().ok())
            .unwrap_or_default();
        Admission::Rejected {
            remaining: 0,
            retry_after,
        }
    }

    /// Quota left for `client_id` in the current window. Does not record.
    #[must_use]
    pub fn remaining(&self, client_id: &str) -> u32 {
        let now = self.clock.now();
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let used = state
            .get(client_id)
            .map_or(0, |w| live_count(w, now, self.config.window()));
        remaining_of(self.config.max_requests as usize, used)
    }

    /// Time until `client_id` may be admitted again, or `None` if it has
    /// quota now.
    #[must_use]
    pub fn retry_after(&self, client_id: &str) -> Option<std::time::Duration> {
        let now = self.clock.now();
        let span = self.config.window();
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let window = state.get(client_id)?;

        let mut live = window.iter().filter(|&&ts| now - ts < span);
        let oldest = *live.next()?;
        if live.count() + 1 < self.config.max_requests as usize {
            return None;
        }
        (oldest + span - now).to_std().ok()
    }

    /// Drops expired timestamps for every client and forgets clients with
    /// none left. Returns the number of clients forgotten.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let span = self.config.window();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let before = state.len();
        state.retain(|_, window| {
            prune(window, now, span);
            !window.is_empty()
        });
        before - state.len()
    }

    /// Number of clients with recorded state.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn remaining_of(max: usize, used: usize) -> u32 {
    u32::try_from(max.saturating_sub(used)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter(max: u32, window: u32) -> (RateLimiter, ManualClock) {
        let clock = ManualClock::default();
        let limiter = RateLimiter::with_clock(
            RateLimitConfig::new(max, window).unwrap(),
            Arc::new(clock.clone()),
        );
        (limiter, clock)
    }

    #[test]
    fn config_rejects_zero_values() {
        assert_eq!(
            RateLimitConfig::new(0, 60),
            Err(ConfigError::ZeroMaxRequests)
        );
        assert_eq!(RateLimitConfig::new(3, 0), Err(ConfigError::ZeroWindow));
    }

    #[test]
    fn config_deserialize_validates() {
        let ok: RateLimitConfig =
            serde_json::from_str(r#"{"max_requests":3,"window_seconds":60}"#).unwrap();
        assert_eq!(ok.max_requests(), 3);
        assert!(
            serde_json::from_str::<RateLimitConfig>(r#"{"max_requests":0,"window_seconds":60}"#)
                .is_err()
        );
    }

    #[test]
    fn burst_then_reject_then_recover() {
        let (limiter, clock) = limiter(3, 60);

        assert!(limiter.admit("x"));
        assert!(limiter.admit("x"));
        assert!(limiter.admit("x"));
        assert!(!limiter.admit("x"));

        clock.advance(Duration::seconds(61));
        assert!(limiter.admit("x"));
    }

    #[test]
    fn rejection_does_not_record() {
        let (limiter, clock) = limiter(1, 60);

        assert!(limiter.admit("x"));
        clock.advance(Duration::seconds(30));
        assert!(!limiter.admit("x"));
        assert!(!limiter.admit("x"));

        // Only the first admit counts, so quota returns 60s after it.
        clock.advance(Duration::seconds(30));
        assert!(limiter.admit("x"));
    }

    #[test]
    fn window_slides_rather_than_resets() {
        let (limiter, clock) = limiter(2, 60);

        assert!(limiter.admit("x"));
        clock.advance(Duration::seconds(40));
        assert!(limiter.admit("x"));
        clock.advance(Duration::seconds(30));

        // The first admit aged out, the second is still in the window.
        assert_eq!(limiter.remaining("x"), 1);
        assert!(limiter.admit("x"));
        assert!(!limiter.admit("x"));
    }

    #[test]
    fn clients_are_isolated() {
        let (limiter, _clock) = limiter(2, 60);

        assert!(limiter.admit("a"));
        assert!(limiter.admit("a"));
        assert!(!limiter.admit("a"));

        assert!(limiter.admit("b"));
        assert_eq!(limiter.remaining("b"), 1);
    }

    #[test]
    fn empty_identity_is_its_own_bucket() {
        let (limiter, _clock) = limiter(1, 60);

        assert!(limiter.admit(""));
        assert!(!limiter.admit(""));
        assert!(limiter.admit("unknown"));
    }

    #[test]
    fn remaining_does_not_record() {
        let (limiter, _clock) = limiter(3, 60);

        assert_eq!(limiter.remaining("x"), 3);
        assert_eq!(limiter.remaining("x"), 3);
        limiter.admit("x");
        assert_eq!(limiter.remaining("x"), 2);
    }

    #[test]
    fn check_and_record_reports_retry_after() {
        let (limiter, clock) = limiter(2, 60);

        assert_eq!(
            limiter.check_and_record("x"),
            Admission::Allowed { remaining: 1 }
        );
        clock.advance(Duration::seconds(10));
        assert_eq!(
            limiter.check_and_record("x"),
            Admission::Allowed { remaining: 0 }
        );
        clock.advance(Duration::seconds(5));

        let rejected = limiter.check_and_record("x");
        assert_eq!(
            rejected,
            Admission::Rejected {
                remaining: 0,
                retry_after: std::time::Duration::from_secs(45),
            }
        );
        assert_eq!(
            limiter.retry_after("x"),
            Some(std::time::Duration::from_secs(45))
        );
    }

    #[test]
    fn retry_after_is_none_with_quota() {
        let (limiter, _clock) = limiter(2, 60);
        assert_eq!(limiter.retry_after("x"), None);
        limiter.admit("x");
        assert_eq!(limiter.retry_after("x"), None);
    }

    #[test]
    fn purge_forgets_idle_clients() {
        let (limiter, clock) = limiter(5, 60);

        limiter.admit("idle");
        clock.advance(Duration::seconds(50));
        limiter.admit("active");
        clock.advance(Duration::seconds(20));

        assert_eq!(limiter.purge_expired(), 1);
        assert_eq!(limiter.tracked_clients(), 1);
        assert_eq!(limiter.remaining("active"), 4);
    }

    #[test]
    fn clones_share_state() {
        let (limiter, _clock) = limiter(1, 60);
        let other = limiter.clone();

        assert!(limiter.admit("x"));
        assert!(!other.admit("x"));
    }

    #[test]
    fn concurrent_admits_never_exceed_quota() {
        let limiter = RateLimiter::new(RateLimitConfig::new(10, 60).unwrap());

        let admitted: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let limiter = limiter.clone();
                    scope.spawn(move || (0..5).filter(|_| limiter.admit("x")).count())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(admitted, 10);
    }
}
