//! Timer Module
//!
//! Single-shot, cancellable timers used to drive TTL expiry.

mod scheduler;

pub use scheduler::{delay_from_millis, CancelHandle, Scheduler, TimerTask, TokioScheduler};
