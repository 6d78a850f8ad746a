//! # Global runtime configuration.
//!
//! Provides [`Config`], the centralized settings for a fleet run.
//!
//! Config is used in two ways:
//! 1. **Supervisor creation**: `Supervisor::builder(config)`
//! 2. **Standalone loops**: `Handler::new(..., config.poll_timeout)` for
//!    embeddings that pump a dispatch loop themselves

use std::time::Duration;

/// Global configuration for a fleet run.
///
/// ## Field semantics
/// - `poll_timeout`: how long a dispatch loop waits for one envelope before
///   re-checking liveness (the orphan-detection heartbeat period)
/// - `join_grace`: maximum wait per worker at shutdown before its loop is
///   forcibly aborted
/// - `channel_capacity`: buffer size of every channel (min 1; clamped)
#[derive(Clone, Debug)]
pub struct Config {
    /// Poll window of a dispatch loop's receive step.
    ///
    /// An empty window triggers the liveness probe; a lost parent stops the
    /// loop. Smaller values detect orphaning faster at the cost of more
    /// wakeups.
    pub poll_timeout: Duration,

    /// Maximum wait for each worker's loop to finish at shutdown.
    ///
    /// A loop still running past the grace is aborted and joined again.
    pub join_grace: Duration,

    /// Capacity of the shared channel and of every dedicated channel.
    ///
    /// Senders back-pressure once a channel is full. Minimum value is 1.
    pub channel_capacity: usize,
}

impl Config {
    /// Returns the channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn channel_capacity_clamped(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `poll_timeout = 100ms` (orphan detection within a tenth of a second)
    /// - `join_grace = 1s` (bounded shutdown per worker)
    /// - `channel_capacity = 64` (small fleets, bursty traffic)
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(100),
            join_grace: Duration::from_secs(1),
            channel_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.poll_timeout, Duration::from_millis(100));
        assert_eq!(cfg.join_grace, Duration::from_secs(1));
        assert_eq!(cfg.channel_capacity, 64);
    }

    #[test]
    fn capacity_is_clamped() {
        let cfg = Config {
            channel_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.channel_capacity_clamped(), 1);
    }
}
