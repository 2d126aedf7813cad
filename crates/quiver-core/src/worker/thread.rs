//! OS-thread worker backend.
//!
//! Each job gets its own named thread. The join handle is dropped right
//! away: the pool learns about completion through the job's result channel,
//! and a thread that outlives its timeout simply finishes on its own.

use std::thread;

use super::{Job, WorkerBackend, WorkerError};

/// Runs each job on a freshly spawned OS thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadBackend {
    stack_size: Option<usize>,
}

impl ThreadBackend {
    /// A backend using the platform's default thread stack size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the stack size for worker threads, in bytes.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl WorkerBackend for ThreadBackend {
    fn name(&self) -> &str {
        "thread"
    }

    fn available(&self) -> bool {
        // Targets without threads (e.g. wasm32-unknown-unknown) report
        // `Unsupported` here.
        thread::available_parallelism().is_ok()
    }

    fn isolated(&self) -> bool {
        true
    }

    fn spawn(&self, label: &str, job: Job) -> Result<(), WorkerError> {
        let mut builder = thread::Builder::new().name(label.to_string());
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }
        builder
            .spawn(job)
            .map(drop)
            .map_err(|e| WorkerError::Spawn(format!("{label}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn test_runs_job_on_named_thread() {
        let backend = ThreadBackend::new().with_stack_size(256 * 1024);
        let (tx, rx) = mpsc::channel();
        backend
            .spawn(
                "quiver-worker-7",
                Box::new(move || {
                    let name = thread::current().name().map(str::to_string);
                    tx.send(name).unwrap();
                }),
            )
            .unwrap();

        assert_eq!(rx.recv().unwrap().as_deref(), Some("quiver-worker-7"));
        assert!(backend.isolated());
        assert_eq!(backend.name(), "thread");
    }
}
