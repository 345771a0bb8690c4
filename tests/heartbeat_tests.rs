//! Cross-process protocol tests: what the worker writes, the supervisor
//! reads. Both halves run in-process here; the file is the contract.

use forklift::supervisor::watchdog::{is_stale, read_heartbeat};
use forklift::worker::heartbeat::{epoch_secs, InFlightTracker};
use tempfile::tempdir;

#[test]
fn supervisor_sees_oldest_in_flight_request() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("worker-1");
    let tracker = InFlightTracker::new(&path);

    assert_eq!(read_heartbeat(&path), None);

    let first = tracker.begin();
    let second = tracker.begin();
    let observed = read_heartbeat(&path).expect("heartbeat should be published");
    assert!(observed <= epoch_secs());

    // Finishing the newer request leaves the oldest epoch in place
    tracker.finish(second);
    assert_eq!(read_heartbeat(&path), Some(observed));

    tracker.finish(first);
    assert_eq!(read_heartbeat(&path), None);
}

#[test]
fn fresh_request_is_not_stale() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("worker-1");
    let tracker = InFlightTracker::new(&path);

    let _id = tracker.begin();
    let observed = read_heartbeat(&path).unwrap();
    assert!(!is_stale(observed, epoch_secs(), 120));
}

#[test]
fn old_request_crosses_the_timeout_boundary() {
    // Simulate a worker that published two minutes ago
    let dir = tempdir().unwrap();
    let path = dir.path().join("worker-1");
    let started = epoch_secs() - 121;
    std::fs::write(&path, started.to_string()).unwrap();

    let observed = read_heartbeat(&path).unwrap();
    assert!(is_stale(observed, epoch_secs(), 120));
    assert!(!is_stale(observed, epoch_secs(), 300));
}
