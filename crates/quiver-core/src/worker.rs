//! Bounded worker pool for parallel-capable strategies.
//!
//! A [`WorkerPool`] owns a fixed number of slots. Dispatching a strategy
//! takes a slot, hands the strategy's parallel path to a [`WorkerBackend`],
//! and waits for the result under a timeout. The pool never queues: when
//! every slot is taken the dispatch fails immediately with
//! [`WorkerError::Exhausted`], and the engine runs the strategy on the
//! caller's thread instead.
//!
//! ## Task lifecycle
//!
//! ```text
//! Idle ──▶ Dispatched ──▶ Running ──┬──▶ Completed ──┐
//!               │                   ├──▶ Failed ─────┼──▶ Released
//!               └──▶ Failed         └──▶ TimedOut ───┘
//! ```
//!
//! The slot travels with the job and is freed when the worker finishes, or
//! when a job that never started is dropped. A worker that outlives its
//! timeout cannot be stopped: it keeps its slot until it returns, and its
//! result is discarded. Repeated timeouts therefore exhaust the pool instead
//! of piling up threads, and later calls fall back to the caller's thread.

pub mod inline;
pub mod thread;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use quiver_config::WorkerConfig;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, oneshot};

pub use inline::InlineBackend;
pub use thread::ThreadBackend;

use crate::error::EngineError;
use crate::registry::SharedStrategy;
use crate::strategy::{StrategyError, guarded};

/// A unit of work handed to a backend.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors from worker-pool dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerError {
    #[error("worker pool exhausted ({capacity} slots busy)")]
    Exhausted { capacity: usize },

    #[error("worker timed out after {0:?}")]
    TimedOut(Duration),

    #[error("worker execution failed: {0}")]
    Execution(#[source] StrategyError),

    #[error("failed to start worker: {0}")]
    Spawn(String),

    #[error("worker exited without reporting a result")]
    Disconnected,
}

// ── Backends ────────────────────────────────────────────────────────────

/// Platform adapter that actually runs a [`Job`].
pub trait WorkerBackend: Send + Sync {
    /// Short name for logs (e.g. "thread", "inline").
    fn name(&self) -> &str;

    /// Whether this backend can run on the current platform.
    fn available(&self) -> bool;

    /// Whether jobs run off the caller's thread.
    ///
    /// Timeouts are only enforced for isolated backends; a non-isolated
    /// backend has already finished the job by the time `spawn` returns.
    fn isolated(&self) -> bool;

    /// Start `job`. `label` names the worker in logs and thread names.
    fn spawn(&self, label: &str, job: Job) -> Result<(), WorkerError>;
}

/// Worker backend preference, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Use OS threads when the platform has them, otherwise run inline.
    #[default]
    Auto,
    /// Force OS threads.
    Thread,
    /// Force inline execution on the caller's thread.
    Inline,
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendPreference::Auto => write!(f, "auto"),
            BackendPreference::Thread => write!(f, "thread"),
            BackendPreference::Inline => write!(f, "inline"),
        }
    }
}

impl FromStr for BackendPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendPreference::Auto),
            "thread" => Ok(BackendPreference::Thread),
            "inline" => Ok(BackendPreference::Inline),
            other => Err(format!("unknown worker backend '{other}'")),
        }
    }
}

/// Resolve a preference to a concrete backend for this platform.
///
/// A thread backend that is unavailable degrades to inline execution with
/// a warning; it is not an error.
pub fn select_backend(preference: &BackendPreference) -> Arc<dyn WorkerBackend> {
    match preference {
        BackendPreference::Inline => Arc::new(InlineBackend),
        BackendPreference::Thread | BackendPreference::Auto => {
            let threads = ThreadBackend::new();
            if threads.available() {
                Arc::new(threads)
            } else {
                tracing::warn!(
                    preference = %preference,
                    "No worker threads on this platform, running parallel strategies inline"
                );
                Arc::new(InlineBackend)
            }
        }
    }
}

// ── Task lifecycle ──────────────────────────────────────────────────────

/// State of one dispatched task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Dispatched,
    Running,
    Completed,
    Failed,
    TimedOut,
    Released,
}

impl TaskState {
    /// Whether the task has produced its outcome.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::TimedOut
        )
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: TaskState) -> bool {
        use TaskState::*;
        match (self, next) {
            (Idle, Dispatched) | (Idle, Released) => true,
            (Dispatched, Running) | (Dispatched, Failed) => true,
            (Running, Completed) | (Running, Failed) | (Running, TimedOut) => true,
            (from, Released) => from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Idle => "idle",
            TaskState::Dispatched => "dispatched",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::TimedOut => "timed-out",
            TaskState::Released => "released",
        };
        f.write_str(s)
    }
}

/// Caller-side record of one dispatch. It tracks the lifecycle; the slot
/// itself is owned by the job.
pub struct WorkerTask {
    id: u64,
    strategy: String,
    state: TaskState,
}

impl WorkerTask {
    fn new(id: u64, strategy: &str) -> Self {
        Self {
            id,
            strategy: strategy.to_string(),
            state: TaskState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> TaskState {
        self.state
    }

    fn label(&self) -> String {
        format!("quiver-worker-{}", self.id)
    }

    fn advance(&mut self, next: TaskState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal task transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!(
            task = self.id,
            strategy = %self.strategy,
            from = %self.state,
            to = %next,
            "Worker task transition"
        );
        self.state = next;
    }
}

impl Drop for WorkerTask {
    fn drop(&mut self) {
        if !self.state.is_terminal() && self.state != TaskState::Idle {
            tracing::debug!(
                task = self.id,
                strategy = %self.strategy,
                state = %self.state,
                "Worker task abandoned before completion"
            );
        }
        self.state = TaskState::Released;
    }
}

// ── Pool ────────────────────────────────────────────────────────────────

/// Snapshot of pool activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: usize,
    pub in_flight: usize,
    pub dispatched: u64,
    pub completed: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub rejected: u64,
}

#[derive(Default)]
struct Counters {
    dispatched: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
    rejected: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fixed-capacity pool of worker slots.
pub struct WorkerPool {
    backend: Arc<dyn WorkerBackend>,
    slots: Arc<Semaphore>,
    capacity: usize,
    timeout: Duration,
    next_id: AtomicU64,
    counters: Counters,
}

impl WorkerPool {
    /// Default per-task timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a pool with `capacity` slots on `backend`.
    ///
    /// A capacity of zero is allowed and rejects every dispatch.
    pub fn new(backend: Arc<dyn WorkerBackend>, capacity: usize) -> Self {
        Self {
            backend,
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
            timeout: Self::DEFAULT_TIMEOUT,
            next_id: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    /// Build a pool from the `[worker]` configuration section.
    pub fn from_config(config: &WorkerConfig) -> Result<Self, EngineError> {
        let preference: BackendPreference = config
            .backend
            .parse()
            .map_err(EngineError::Configuration)?;
        let backend = select_backend(&preference);
        tracing::debug!(
            backend = backend.name(),
            max_concurrent = config.max_concurrent,
            timeout_ms = config.timeout_ms,
            "Worker pool configured"
        );
        Ok(Self::new(backend, config.max_concurrent).with_timeout(config.timeout()))
    }

    /// Builder: override the per-task timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The backend jobs run on.
    pub fn backend(&self) -> &dyn WorkerBackend {
        self.backend.as_ref()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Per-task timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Slots currently free.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Activity counters.
    pub fn stats(&self) -> PoolStats {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        PoolStats {
            capacity: self.capacity,
            in_flight: self.capacity.saturating_sub(self.available_slots()),
            dispatched: load(&self.counters.dispatched),
            completed: load(&self.counters.completed),
            failed: load(&self.counters.failed),
            timed_out: load(&self.counters.timed_out),
            rejected: load(&self.counters.rejected),
        }
    }

    /// Run `strategy`'s parallel path on a worker with the pool's timeout.
    pub async fn dispatch<I, O>(
        &self,
        strategy: SharedStrategy<I, O>,
        input: I,
    ) -> Result<O, WorkerError>
    where
        I: Send + 'static,
        O: Send + 'static,
    {
        self.dispatch_with_timeout(strategy, input, self.timeout).await
    }

    /// Run `strategy`'s parallel path on a worker, waiting at most `timeout`.
    pub async fn dispatch_with_timeout<I, O>(
        &self,
        strategy: SharedStrategy<I, O>,
        input: I,
        timeout: Duration,
    ) -> Result<O, WorkerError>
    where
        I: Send + 'static,
        O: Send + 'static,
    {
        let permit = Arc::clone(&self.slots).try_acquire_owned().map_err(|_| {
            Counters::bump(&self.counters.rejected);
            WorkerError::Exhausted {
                capacity: self.capacity,
            }
        })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut task = WorkerTask::new(id, strategy.name());
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            let slot: OwnedSemaphorePermit = permit;
            let outcome = guarded(|| strategy.execute_parallel(input));
            // Free the slot before reporting, so a caller that sees the
            // result also sees the slot released.
            drop(slot);
            // The receiver is gone after a timeout; the result is dropped.
            let _ = tx.send(outcome);
        });

        task.advance(TaskState::Dispatched);
        if let Err(e) = self.backend.spawn(&task.label(), job) {
            task.advance(TaskState::Failed);
            Counters::bump(&self.counters.failed);
            tracing::warn!(
                task = id,
                backend = self.backend.name(),
                error = %e,
                "Worker spawn failed"
            );
            return Err(e);
        }
        task.advance(TaskState::Running);
        Counters::bump(&self.counters.dispatched);

        let received = if self.backend.isolated() {
            match tokio::time::timeout(timeout, rx).await {
                Ok(received) => received,
                Err(_) => {
                    task.advance(TaskState::TimedOut);
                    Counters::bump(&self.counters.timed_out);
                    tracing::warn!(
                        task = id,
                        timeout_ms = timeout.as_millis() as u64,
                        "Worker timed out, detaching"
                    );
                    return Err(WorkerError::TimedOut(timeout));
                }
            }
        } else {
            rx.await
        };

        match received {
            Ok(Ok(output)) => {
                task.advance(TaskState::Completed);
                Counters::bump(&self.counters.completed);
                Ok(output)
            }
            Ok(Err(e)) => {
                task.advance(TaskState::Failed);
                Counters::bump(&self.counters.failed);
                Err(WorkerError::Execution(e))
            }
            Err(_) => {
                task.advance(TaskState::Failed);
                Counters::bump(&self.counters.failed);
                Err(WorkerError::Disconnected)
            }
        }
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("backend", &self.backend.name())
            .field("capacity", &self.capacity)
            .field("timeout", &self.timeout)
            .finish()
    }
}
