//! Worker slot state machine and restart policy
//!
//! Pure decision logic, separated from the fork/wait plumbing so it can be
//! tested without processes. The lifecycle per slot:
//!
//! `Starting -> Serving -> (TimeoutKilled | NormalExit | Crashed) -> restarted`
//!
//! looping until the supervisor itself stops.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Starting,
    Serving,
    TimeoutKilled,
    NormalExit,
    Crashed,
}

impl WorkerState {
    /// Terminal states are the ones a restart recovers from
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerState::TimeoutKilled | WorkerState::NormalExit | WorkerState::Crashed
        )
    }
}

/// How a worker process ended, as observed by the reaper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// Exit code 0
    Normal,
    /// Non-zero exit code
    Crashed(i32),
    /// Killed by the watchdog for exceeding the request timeout
    TimeoutKilled,
    /// Killed by a signal the supervisor did not send
    Signaled(i32),
}

impl ExitKind {
    pub fn state(&self) -> WorkerState {
        match self {
            ExitKind::Normal => WorkerState::NormalExit,
            ExitKind::Crashed(_) => WorkerState::Crashed,
            ExitKind::TimeoutKilled => WorkerState::TimeoutKilled,
            ExitKind::Signaled(_) => WorkerState::Crashed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    Restart,
    /// Too many rapid failures: the pool cannot boot and the supervisor
    /// must not degrade into a restart storm
    Abort,
}

/// Restart policy for exited workers
///
/// Timeout kills and normal exits always restart. Crashes that happen
/// within `rapid_window` of the spawn count toward `max_rapid_failures`;
/// reaching it aborts the whole supervisor.
#[derive(Debug, Clone, Copy)]
pub struct RestartPolicy {
    pub rapid_window: Duration,
    pub max_rapid_failures: u32,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            rapid_window: Duration::from_secs(1),
            max_rapid_failures: 5,
        }
    }
}

impl RestartPolicy {
    /// Whether this exit counts as a rapid failure
    pub fn is_rapid_failure(&self, uptime: Duration, exit: &ExitKind) -> bool {
        matches!(exit, ExitKind::Crashed(_) | ExitKind::Signaled(_)) && uptime < self.rapid_window
    }

    pub fn assess(&self, consecutive_rapid_failures: u32) -> RestartDecision {
        if consecutive_rapid_failures >= self.max_rapid_failures {
            RestartDecision::Abort
        } else {
            RestartDecision::Restart
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_kinds_map_to_terminal_states() {
        assert_eq!(ExitKind::Normal.state(), WorkerState::NormalExit);
        assert_eq!(ExitKind::Crashed(3).state(), WorkerState::Crashed);
        assert_eq!(ExitKind::TimeoutKilled.state(), WorkerState::TimeoutKilled);
        assert_eq!(ExitKind::Signaled(9).state(), WorkerState::Crashed);
        assert!(ExitKind::Normal.state().is_terminal());
        assert!(!WorkerState::Serving.is_terminal());
    }

    #[test]
    fn timeout_kill_is_never_a_rapid_failure() {
        let policy = RestartPolicy::default();
        assert!(!policy.is_rapid_failure(Duration::from_millis(10), &ExitKind::TimeoutKilled));
    }

    #[test]
    fn slow_crash_is_not_rapid() {
        let policy = RestartPolicy::default();
        assert!(!policy.is_rapid_failure(Duration::from_secs(30), &ExitKind::Crashed(4)));
    }

    #[test]
    fn fast_crash_is_rapid() {
        let policy = RestartPolicy::default();
        assert!(policy.is_rapid_failure(Duration::from_millis(100), &ExitKind::Crashed(3)));
    }

    #[test]
    fn abort_after_max_rapid_failures() {
        let policy = RestartPolicy::default();
        assert_eq!(policy.assess(4), RestartDecision::Restart);
        assert_eq!(policy.assess(5), RestartDecision::Abort);
    }
}
