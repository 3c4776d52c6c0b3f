use std::time::Duration;

/// Clock port for the one-second countdown. Production uses the tokio
/// runtime; tests substitute a manual implementation and drive ticks
/// synchronously.
pub trait Scheduler: Send + Sync {
    /// Invokes `tick` every `period` until it returns `false` or the
    /// returned handle is cancelled. The first invocation happens one full
    /// period after scheduling.
    fn schedule_repeating(
        &self,
        period: Duration,
        tick: Box<dyn FnMut() -> bool + Send>,
    ) -> ScheduleHandle;
}

/// Cancellation token for a repeating schedule. Cancels on drop, so a
/// leaked handle cannot leave a timer running.
pub struct ScheduleHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduleHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Repeating schedule on the tokio runtime. Must be used from within a
/// runtime context.
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule_repeating(
        &self,
        period: Duration,
        mut tick: Box<dyn FnMut() -> bool + Send>,
    ) -> ScheduleHandle {
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                if !tick() {
                    break;
                }
            }
        });
        ScheduleHandle::new(move || task.abort())
    }
}
