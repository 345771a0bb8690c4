use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};
use tracing::{error, info, warn};

use crate::app::EntryPoint;
use crate::errors::{ForkliftError, Result};
use crate::system::signal::{install_shutdown_handlers, shutdown_requested};
use crate::worker::heartbeat::epoch_secs;
use crate::worker::{self, WorkerSettings};

use super::slot::{ExitKind, RestartDecision, RestartPolicy, WorkerState};
use super::watchdog;

const SUPERVISE_TICK: Duration = Duration::from_millis(500);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Fixed launch policy the supervisor runs, taken from the image metadata
#[derive(Debug, Clone)]
pub struct ServePlan {
    pub entry: EntryPoint,
    pub workers: usize,
    pub threads: usize,
    /// Hard per-request timeout in seconds
    pub timeout: u64,
    pub heartbeat_dir: PathBuf,
}

struct Slot {
    index: usize,
    pid: Pid,
    spawned_at: Instant,
    state: WorkerState,
    heartbeat_path: PathBuf,
}

pub struct Supervisor {
    plan: ServePlan,
    listener: TcpListener,
    slots: Vec<Option<Slot>>,
    policy: RestartPolicy,
    consecutive_rapid_failures: u32,
}

impl Supervisor {
    pub fn new(listener: TcpListener, plan: ServePlan) -> Self {
        let slots = (0..plan.workers).map(|_| None).collect();
        Self {
            plan,
            listener,
            slots,
            policy: RestartPolicy::default(),
            consecutive_rapid_failures: 0,
        }
    }

    /// Supervisor main loop. Returns when a shutdown signal arrives or the
    /// boot-loop guard aborts; children are stopped either way.
    pub fn run(mut self) -> Result<()> {
        install_shutdown_handlers()?;
        fs::create_dir_all(&self.plan.heartbeat_dir).map_err(|e| {
            ForkliftError::worker_lifecycle(format!(
                "cannot create heartbeat directory {}: {}",
                self.plan.heartbeat_dir.display(),
                e
            ))
        })?;

        info!(
            "supervising {} worker(s) x {} thread(s), {}s request timeout",
            self.plan.workers, self.plan.threads, self.plan.timeout
        );
        for index in 0..self.plan.workers {
            self.spawn(index)?;
        }

        let outcome = self.supervise();
        self.shutdown_children();
        outcome
    }

    fn supervise(&mut self) -> Result<()> {
        loop {
            if shutdown_requested() {
                info!("shutdown signal received");
                return Ok(());
            }
            self.reap()?;
            self.scan_heartbeats();
            thread::sleep(SUPERVISE_TICK);
        }
    }

    /// Fork a worker into `index`. Runs in both processes: the child never
    /// returns, it exits with the worker's status code.
    fn spawn(&mut self, index: usize) -> Result<()> {
        let heartbeat_path = self.plan.heartbeat_dir.join(format!("worker-{}", index));
        // A dead worker's last heartbeat must not count against its
        // replacement
        let _ = fs::remove_file(&heartbeat_path);

        let listener = self.listener.try_clone().map_err(|e| {
            ForkliftError::worker_lifecycle(format!("cannot clone listener: {}", e))
        })?;
        let settings = WorkerSettings {
            slot: index,
            entry: self.plan.entry.clone(),
            threads: self.plan.threads,
            heartbeat_path: heartbeat_path.clone(),
        };

        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                let code = worker::run_worker(listener, settings);
                std::process::exit(code);
            }
            Ok(ForkResult::Parent { child }) => {
                info!("worker {} spawned (pid {})", index, child);
                self.slots[index] = Some(Slot {
                    index,
                    pid: child,
                    spawned_at: Instant::now(),
                    state: WorkerState::Serving,
                    heartbeat_path,
                });
                Ok(())
            }
            Err(e) => Err(ForkliftError::worker_lifecycle(format!(
                "fork failed for worker {}: {}",
                index, e
            ))),
        }
    }

    /// Collect exited children and restart them per policy
    fn reap(&mut self) -> Result<()> {
        loop {
            match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(pid, code)) => {
                    let kind = if code == 0 {
                        ExitKind::Normal
                    } else {
                        ExitKind::Crashed(code)
                    };
                    self.on_worker_exit(pid, kind)?;
                }
                Ok(WaitStatus::Signaled(pid, sig, _)) => {
                    // Watchdog kills were marked on the slot before SIGKILL
                    let timeout_killed = self.slot_state(pid) == Some(WorkerState::TimeoutKilled);
                    let kind = if timeout_killed {
                        ExitKind::TimeoutKilled
                    } else {
                        ExitKind::Signaled(sig as i32)
                    };
                    self.on_worker_exit(pid, kind)?;
                }
                Ok(WaitStatus::StillAlive) => break,
                Ok(_) => continue,
                Err(Errno::ECHILD) => break,
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    return Err(ForkliftError::worker_lifecycle(format!(
                        "waitpid failed: {}",
                        e
                    )));
                }
            }
        }
        Ok(())
    }

    fn on_worker_exit(&mut self, pid: Pid, kind: ExitKind) -> Result<()> {
        let Some(index) = self
            .slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.pid == pid))
        else {
            warn!("reaped unknown child {}", pid);
            return Ok(());
        };
        let Some(slot) = self.slots[index].take() else {
            return Ok(());
        };

        let uptime = slot.spawned_at.elapsed();
        match kind {
            ExitKind::Normal => {
                info!(
                    "worker {} (pid {}) exited normally after {:.1?}",
                    slot.index, pid, uptime
                );
            }
            ExitKind::TimeoutKilled => {
                warn!(
                    "worker {} (pid {}) killed after exceeding the {}s request timeout, restarting",
                    slot.index, pid, self.plan.timeout
                );
            }
            ExitKind::Crashed(code) => {
                error!(
                    "worker {} (pid {}) exited with code {} after {:.1?}",
                    slot.index, pid, code, uptime
                );
            }
            ExitKind::Signaled(sig) => {
                error!(
                    "worker {} (pid {}) killed by signal {} after {:.1?}",
                    slot.index, pid, sig, uptime
                );
            }
        }

        if self.policy.is_rapid_failure(uptime, &kind) {
            self.consecutive_rapid_failures += 1;
        } else {
            self.consecutive_rapid_failures = 0;
        }

        if shutdown_requested() {
            // The shutdown path reaps the rest; no replacement
            return Ok(());
        }

        match self.policy.assess(self.consecutive_rapid_failures) {
            RestartDecision::Abort => Err(ForkliftError::worker_lifecycle(format!(
                "aborting: {} consecutive rapid worker failures, the pool cannot boot",
                self.consecutive_rapid_failures
            ))),
            RestartDecision::Restart => self.spawn(slot.index),
        }
    }

    /// Kill any worker whose oldest in-flight request exceeded the timeout
    fn scan_heartbeats(&mut self) {
        let now = epoch_secs();
        for slot in self.slots.iter_mut().flatten() {
            if slot.state != WorkerState::Serving {
                continue;
            }
            if let Some(oldest) = watchdog::read_heartbeat(&slot.heartbeat_path) {
                if watchdog::is_stale(oldest, now, self.plan.timeout) {
                    warn!(
                        "worker {} (pid {}) request running past {}s, killing worker",
                        slot.index, slot.pid, self.plan.timeout
                    );
                    slot.state = WorkerState::TimeoutKilled;
                    if let Err(e) = signal::kill(slot.pid, Signal::SIGKILL) {
                        error!("failed to kill worker {} (pid {}): {}", slot.index, slot.pid, e);
                    }
                }
            }
        }
    }

    /// TERM first, KILL whatever is still around after the grace period
    fn shutdown_children(&mut self) {
        for slot in self.slots.iter().flatten() {
            let _ = signal::kill(slot.pid, Signal::SIGTERM);
        }

        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while Instant::now() < deadline && self.live_count() > 0 {
            self.reap_quietly();
            thread::sleep(Duration::from_millis(100));
        }

        for slot in self.slots.iter().flatten() {
            warn!(
                "worker {} (pid {}) did not stop in time, force killing",
                slot.index, slot.pid
            );
            let _ = signal::kill(slot.pid, Signal::SIGKILL);
        }
        self.reap_blocking();
        info!("all workers stopped");
    }

    fn reap_quietly(&mut self) {
        loop {
            match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(pid, _)) | Ok(WaitStatus::Signaled(pid, _, _)) => {
                    self.clear_slot(pid);
                }
                Ok(WaitStatus::StillAlive) => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    fn reap_blocking(&mut self) {
        while self.live_count() > 0 {
            match waitpid(Pid::from_raw(-1), None) {
                Ok(WaitStatus::Exited(pid, _)) | Ok(WaitStatus::Signaled(pid, _, _)) => {
                    self.clear_slot(pid);
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    fn clear_slot(&mut self, pid: Pid) {
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|s| s.pid == pid) {
                *slot = None;
            }
        }
    }

    fn live_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    fn slot_state(&self, pid: Pid) -> Option<WorkerState> {
        self.slots
            .iter()
            .flatten()
            .find(|s| s.pid == pid)
            .map(|s| s.state)
    }
}
