//! In-flight request accounting
//!
//! Each worker owns one heartbeat file. The file holds the start epoch of
//! the worker's oldest in-flight request, or nothing while idle. The
//! supervisor reads it to decide whether the worker has exceeded the hard
//! request timeout. Request ids are allocated in ascending order, so the
//! first map entry is always the oldest request.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

pub fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub struct InFlightTracker {
    next_id: AtomicU64,
    inflight: Mutex<BTreeMap<u64, u64>>,
    heartbeat_path: PathBuf,
}

impl InFlightTracker {
    pub fn new<P: AsRef<Path>>(heartbeat_path: P) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inflight: Mutex::new(BTreeMap::new()),
            heartbeat_path: heartbeat_path.as_ref().to_path_buf(),
        }
    }

    /// Record a request start, returning its id for the matching `finish`
    pub fn begin(&self) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let started = epoch_secs();
        {
            let mut inflight = self
                .inflight
                .lock()
                .expect("InFlight Mutex poisoned - a thread panicked while holding the lock");
            inflight.insert(id, started);
        }
        self.publish();
        id
    }

    pub fn finish(&self, id: u64) {
        {
            let mut inflight = self
                .inflight
                .lock()
                .expect("InFlight Mutex poisoned - a thread panicked while holding the lock");
            inflight.remove(&id);
        }
        self.publish();
    }

    /// Start epoch of the oldest in-flight request
    pub fn oldest(&self) -> Option<u64> {
        self.inflight
            .lock()
            .expect("InFlight Mutex poisoned - a thread panicked while holding the lock")
            .values()
            .next()
            .copied()
    }

    pub fn in_flight(&self) -> usize {
        self.inflight
            .lock()
            .expect("InFlight Mutex poisoned - a thread panicked while holding the lock")
            .len()
    }

    pub fn heartbeat_path(&self) -> &Path {
        &self.heartbeat_path
    }

    /// Write the oldest start epoch to the heartbeat file (empty = idle).
    ///
    /// A failed write is logged and otherwise ignored: the watchdog treats
    /// an unreadable heartbeat as healthy, so a transient filesystem issue
    /// cannot kill a working worker.
    fn publish(&self) {
        let content = match self.oldest() {
            Some(epoch) => epoch.to_string(),
            None => String::new(),
        };
        if let Err(e) = fs::write(&self.heartbeat_path, content) {
            debug!(
                "heartbeat publish to {} failed: {}",
                self.heartbeat_path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_in(dir: &tempfile::TempDir) -> InFlightTracker {
        InFlightTracker::new(dir.path().join("worker-0"))
    }

    #[test]
    fn idle_tracker_publishes_empty_heartbeat() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(&dir);
        let id = tracker.begin();
        tracker.finish(id);
        let content = fs::read_to_string(tracker.heartbeat_path()).unwrap();
        assert!(content.is_empty());
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn begin_publishes_start_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(&dir);
        let before = epoch_secs();
        let _id = tracker.begin();
        let content = fs::read_to_string(tracker.heartbeat_path()).unwrap();
        let epoch: u64 = content.parse().unwrap();
        assert!(epoch >= before);
        assert_eq!(tracker.in_flight(), 1);
    }

    #[test]
    fn oldest_survives_newer_completions() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker_in(&dir);
        let first = tracker.begin();
        let second = tracker.begin();
        let oldest = tracker.oldest().unwrap();

        tracker.finish(second);
        assert_eq!(tracker.oldest(), Some(oldest));

        tracker.finish(first);
        assert_eq!(tracker.oldest(), None);
    }
}
