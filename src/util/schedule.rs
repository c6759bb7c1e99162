//! Deferred continuations on the tokio timer.
//!
//! UI pacing delays are scheduled work, never a blocking sleep: the caller
//! returns immediately and other actions keep running while the timer waits.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::time::Duration;

use tokio::task::JoinHandle;

/// Run `f` once after `delay`. Dropping the handle does not cancel it.
pub fn after<F>(delay: Duration, f: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        f();
    })
}
