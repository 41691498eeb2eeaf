//! Session control state shared between the runner and whoever may stop it.
//!
//! The only runtime control a session accepts is a stop request. The flag
//! is an atomic so the tick loop reads it without locking; a [`Notify`]
//! wakes the runner out of its inter-frame wait so a stop takes effect
//! before the next tick instead of after the full wait.

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use crate::config::SimulationBoundsConfig;

/// Reason why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    /// A stop was requested.
    Stopped,
    /// The configured `max_ticks` ticks have all run.
    TickBudgetExhausted,
}

/// Shared control state for one session.
#[derive(Debug)]
pub struct SessionControl {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wakes the runner when a stop arrives.
    stop_notify: Notify,

    /// Wall-clock time when the session started.
    started_at: DateTime<Utc>,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Inter-frame wait.
    stop_poll: Duration,
}

impl SessionControl {
    /// Create control state from configuration.
    pub fn new(bounds: &SimulationBoundsConfig) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            started_at: Utc::now(),
            max_ticks: bounds.max_ticks,
            stop_poll: Duration::from_millis(bounds.stop_poll_ms),
        }
    }

    /// Request a stop. Idempotent.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_waiters();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Wait up to `timeout` for a stop request.
    ///
    /// Returns `true` if a stop was requested before the timeout elapsed
    /// (or already had been).
    pub async fn wait_for_stop(&self, timeout: Duration) -> bool {
        let mut notified = pin!(self.stop_notify.notified());
        // Register before checking the flag so a stop landing in between is
        // not lost.
        notified.as_mut().enable();
        if self.is_stop_requested() {
            return true;
        }
        tokio::time::timeout(timeout, notified).await.is_ok() || self.is_stop_requested()
    }

    /// Check whether the tick limit has been reached.
    ///
    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get the configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Get the configured inter-frame wait.
    pub const fn stop_poll(&self) -> Duration {
        self.stop_poll
    }
}

/// Cloneable handle that stops a running session.
#[derive(Debug, Clone)]
pub struct StopHandle {
    control: Arc<SessionControl>,
}

impl StopHandle {
    /// Wrap shared control state.
    pub const fn new(control: Arc<SessionControl>) -> Self {
        Self { control }
    }

    /// Request that the session stop before its next tick.
    pub fn stop(&self) {
        self.control.request_stop();
    }

    /// Whether a stop has already been requested.
    pub fn is_stopped(&self) -> bool {
        self.control.is_stop_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(max_ticks: u64) -> SimulationBoundsConfig {
        SimulationBoundsConfig {
            max_ticks,
            stop_poll_ms: 800,
            max_entities: 256,
        }
    }

    #[test]
    fn stop_request() {
        let control = SessionControl::new(&bounds(0));
        assert!(!control.is_stop_requested());
        control.request_stop();
        assert!(control.is_stop_requested());
        control.request_stop();
        assert!(control.is_stop_requested());
    }

    #[test]
    fn stop_handle_shares_state() {
        let control = Arc::new(SessionControl::new(&bounds(0)));
        let handle = StopHandle::new(Arc::clone(&control));
        let copy = handle.clone();
        copy.stop();
        assert!(handle.is_stopped());
        assert!(control.is_stop_requested());
    }

    #[test]
    fn tick_limit_zero_means_unlimited() {
        let control = SessionControl::new(&bounds(0));
        assert!(!control.tick_limit_reached(999_999));
    }

    #[test]
    fn tick_limit_reached() {
        let control = SessionControl::new(&bounds(100));
        assert!(!control.tick_limit_reached(99));
        assert!(control.tick_limit_reached(100));
        assert!(control.tick_limit_reached(101));
    }

    #[test]
    fn stop_poll_comes_from_config() {
        let control = SessionControl::new(&bounds(0));
        assert_eq!(control.stop_poll(), Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_stop_times_out_without_request() {
        let control = SessionControl::new(&bounds(0));
        assert!(!control.wait_for_stop(Duration::from_millis(800)).await);
    }

    #[tokio::test]
    async fn wait_for_stop_returns_immediately_when_already_stopped() {
        let control = SessionControl::new(&bounds(0));
        control.request_stop();
        assert!(control.wait_for_stop(Duration::from_secs(3600)).await);
    }

    #[tokio::test]
    async fn wait_for_stop_wakes_on_request() {
        let control = Arc::new(SessionControl::new(&bounds(0)));
        let waiter = Arc::clone(&control);
        let task =
            tokio::spawn(async move { waiter.wait_for_stop(Duration::from_secs(3600)).await });
        tokio::task::yield_now().await;
        control.request_stop();
        let woke = tokio::time::timeout(Duration::from_secs(5), task).await;
        assert!(matches!(woke, Ok(Ok(true))));
    }
}
