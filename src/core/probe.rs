//! # Liveness probes: cooperative parent-death detection.
//!
//! A dispatch loop consults its [`Liveness`] probe whenever a poll window
//! expires (and once more after each receive). A probe reporting the parent
//! gone stops the loop cleanly — the sole cancellation mechanism besides the
//! terminal sentinel; there is no external cancel signal.
//!
//! Two probes ship with the runtime:
//! - [`TokenProbe`] for in-process fleets — backed by a cancellation token
//!   the supervisor cancels on shutdown and, via a drop guard, whenever the
//!   supervising future is dropped.
//! - [`ParentPidProbe`] for cross-process embeddings — compares the parent
//!   process id captured at spawn time against the current one. This is a
//!   cross-platform liveness check in intent; on non-Unix targets, where the
//!   parent id is not observable, it always reports alive and orphan
//!   detection falls back to channel disconnection.

use tokio_util::sync::CancellationToken;

/// Cooperative liveness check consulted by dispatch loops.
pub trait Liveness: Send + Sync + 'static {
    /// Returns true while the supervising parent is still present.
    fn is_alive(&self) -> bool;
}

/// Probe backed by a cancellation token.
///
/// Reports dead once the token is cancelled. Supervisors hand each loop a
/// child token of their runtime token, so one cancellation stops the whole
/// fleet's loops within a poll window.
#[derive(Clone, Debug)]
pub struct TokenProbe {
    token: CancellationToken,
}

impl TokenProbe {
    /// Creates a probe observing `token`.
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl Liveness for TokenProbe {
    fn is_alive(&self) -> bool {
        !self.token.is_cancelled()
    }
}

/// Probe comparing the parent process id captured at spawn time.
///
/// For embeddings that run each dispatch loop in its own operating-system
/// process: the loop captures the parent id once, then detects orphaning
/// when the observed parent changes (on Unix, an orphaned process is
/// re-parented).
#[derive(Clone, Copy, Debug)]
pub struct ParentPidProbe {
    captured: u32,
}

impl ParentPidProbe {
    /// Captures the current parent process id.
    pub fn capture() -> Self {
        Self {
            captured: current_parent_id(),
        }
    }

    /// Creates a probe expecting the given parent process id.
    pub fn new(captured: u32) -> Self {
        Self { captured }
    }
}

impl Liveness for ParentPidProbe {
    #[cfg(unix)]
    fn is_alive(&self) -> bool {
        current_parent_id() == self.captured
    }

    #[cfg(not(unix))]
    fn is_alive(&self) -> bool {
        true
    }
}

#[cfg(unix)]
fn current_parent_id() -> u32 {
    std::os::unix::process::parent_id()
}

#[cfg(not(unix))]
fn current_parent_id() -> u32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_probe_follows_cancellation() {
        let token = CancellationToken::new();
        let probe = TokenProbe::new(token.clone());
        assert!(probe.is_alive());
        token.cancel();
        assert!(!probe.is_alive());
    }

    #[test]
    fn child_token_probe_follows_parent_cancellation() {
        let parent = CancellationToken::new();
        let probe = TokenProbe::new(parent.child_token());
        assert!(probe.is_alive());
        parent.cancel();
        assert!(!probe.is_alive());
    }

    #[cfg(unix)]
    #[test]
    fn captured_parent_is_alive() {
        assert!(ParentPidProbe::capture().is_alive());
    }

    #[cfg(unix)]
    #[test]
    fn foreign_parent_is_dead() {
        // No process has parent id u32::MAX.
        assert!(!ParentPidProbe::new(u32::MAX).is_alive());
    }
}
