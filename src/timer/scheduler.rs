//! One-Shot Scheduler
//!
//! Runs a task exactly once after a delay and hands back a handle that can
//! prevent it from running.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::trace;

use crate::error::{CacheError, Result};

/// Work executed by a timer when it fires.
pub type TimerTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

// == Timer States ==
const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

// == Scheduler Trait ==
/// Schedules one-shot timers.
///
/// No ordering is promised between independent timers beyond their
/// individual delays.
pub trait Scheduler: Send + Sync + fmt::Debug {
    /// Runs `task` once, no sooner than `delay` from now.
    ///
    /// A zero delay fires as soon as the runtime gets to it.
    fn schedule_once(&self, task: TimerTask, delay: Duration) -> Result<CancelHandle>;

    /// Runs a plain callback once after `delay`.
    fn run_once_after<F>(&self, callback: F, delay: Duration) -> Result<CancelHandle>
    where
        F: FnOnce() + Send + 'static,
        Self: Sized,
    {
        self.schedule_once(Box::pin(async move { callback() }), delay)
    }
}

// == Cancel Handle ==
/// Handle to a pending timer.
///
/// Dropping the handle does not cancel the timer.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
    abort: AbortHandle,
}

impl CancelHandle {
    /// Prevents the timer from firing.
    ///
    /// Returns `true` if the timer was still pending. Once this returns
    /// `true` the task is guaranteed never to run. Cancelling a timer that
    /// already fired, or cancelling twice, returns `false` and does nothing.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cancelled {
            self.abort.abort();
        }
        cancelled
    }

    /// Returns true while the timer has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == PENDING
    }

    /// Returns true once the timer has started running its task.
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }
}

// == Tokio Scheduler ==
/// Scheduler backed by tokio tasks and `tokio::time::sleep`.
///
/// Without an explicit runtime handle, timers are spawned on the runtime
/// the caller is running in.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    runtime: Option<Handle>,
}

impl TokioScheduler {
    // == Constructor ==
    /// Creates a scheduler bound to the caller's ambient runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler that always spawns on the given runtime.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime: Some(runtime),
        }
    }

    fn runtime(&self) -> Result<Handle> {
        match &self.runtime {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current().map_err(|e| CacheError::Scheduler(e.to_string())),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, task: TimerTask, delay: Duration) -> Result<CancelHandle> {
        let runtime = self.runtime()?;
        let state = Arc::new(AtomicU8::new(PENDING));
        let task_state = Arc::clone(&state);

        let join = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Losing this race to `cancel` means the task must not run.
            if task_state
                .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                task.await;
            }
        });

        trace!(delay_ms = delay.as_millis() as u64, "Timer scheduled");

        Ok(CancelHandle {
            state,
            abort: join.abort_handle(),
        })
    }
}

// == Utility Functions ==
/// Converts a millisecond delay into a `Duration`, treating negatives as zero.
pub fn delay_from_millis(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}
