use std::time::Duration;

use forklift::supervisor::slot::{ExitKind, RestartDecision, RestartPolicy, WorkerState};

#[test]
fn lifecycle_states_loop_through_restart() {
    // starting -> serving -> terminal -> restarted (modeled as Serving again)
    assert!(!WorkerState::Starting.is_terminal());
    assert!(!WorkerState::Serving.is_terminal());
    for kind in [
        ExitKind::Normal,
        ExitKind::TimeoutKilled,
        ExitKind::Crashed(4),
        ExitKind::Signaled(9),
    ] {
        assert!(kind.state().is_terminal());
    }
}

#[test]
fn hung_worker_kill_is_always_restartable() {
    let policy = RestartPolicy::default();

    // A request hitting the 120s timeout means the worker ran at least
    // that long; but even an instant timeout kill never counts as a
    // rapid failure
    assert!(!policy.is_rapid_failure(Duration::from_millis(1), &ExitKind::TimeoutKilled));
    assert_eq!(policy.assess(0), RestartDecision::Restart);
}

#[test]
fn boot_loop_aborts_after_consecutive_rapid_crashes() {
    let policy = RestartPolicy::default();
    let mut consecutive = 0;

    // An unresolvable entry point makes every worker exit immediately
    // with a non-zero code; the supervisor must stop fast, not restart
    // forever
    let mut decisions = Vec::new();
    for _ in 0..6 {
        let exit = ExitKind::Crashed(3);
        if policy.is_rapid_failure(Duration::from_millis(50), &exit) {
            consecutive += 1;
        } else {
            consecutive = 0;
        }
        decisions.push(policy.assess(consecutive));
    }

    assert_eq!(decisions[3], RestartDecision::Restart);
    assert!(decisions.contains(&RestartDecision::Abort));
}

#[test]
fn healthy_uptime_resets_the_failure_streak() {
    let policy = RestartPolicy::default();
    let mut consecutive = 3;

    // A worker that served for a while before crashing breaks the streak
    let exit = ExitKind::Crashed(4);
    if policy.is_rapid_failure(Duration::from_secs(600), &exit) {
        consecutive += 1;
    } else {
        consecutive = 0;
    }

    assert_eq!(consecutive, 0);
    assert_eq!(policy.assess(consecutive), RestartDecision::Restart);
}

#[test]
fn normal_exits_never_count_toward_abort() {
    let policy = RestartPolicy::default();
    assert!(!policy.is_rapid_failure(Duration::from_millis(1), &ExitKind::Normal));
}
