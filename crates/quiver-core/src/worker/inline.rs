//! Inline worker backend.
//!
//! Runs jobs directly on the calling thread. Used where the platform has no
//! threads, and in tests that need deterministic scheduling. Timeouts are
//! not enforced: the job has finished before the pool starts waiting.

use super::{Job, WorkerBackend, WorkerError};

/// Runs each job synchronously on the caller's thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineBackend;

impl WorkerBackend for InlineBackend {
    fn name(&self) -> &str {
        "inline"
    }

    fn available(&self) -> bool {
        true
    }

    fn isolated(&self) -> bool {
        false
    }

    fn spawn(&self, label: &str, job: Job) -> Result<(), WorkerError> {
        tracing::trace!(label, "Running job inline");
        job();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn test_job_runs_before_spawn_returns() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        InlineBackend
            .spawn("inline-test", Box::new(move || flag.store(true, Ordering::SeqCst)))
            .unwrap();
        assert!(ran.load(Ordering::SeqCst));
        assert!(!InlineBackend.isolated());
    }
}
