//! View controllers: login, registration, and the dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each controller is what a page component would hold: state behind a short
//! mutex, synchronous action handlers, and spawned tasks for network work.
//! Handlers return the spawned `JoinHandle` so callers (and tests) can await
//! completion without the controller blocking.

pub mod dashboard;
pub mod login;
pub mod register;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::state::forms::SubmitOutcome;

/// Result of pressing a submit control.
#[derive(Debug)]
pub enum Submission {
    /// Request in flight.
    Pending(JoinHandle<SubmitOutcome>),
    /// Decided without a request (`Invalid` or `Ignored`).
    Settled(SubmitOutcome),
}

impl Submission {
    /// Wait for the final outcome. A panicked task counts as `Failed`.
    pub async fn outcome(self) -> SubmitOutcome {
        match self {
            Self::Pending(handle) => handle.await.unwrap_or(SubmitOutcome::Failed),
            Self::Settled(outcome) => outcome,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
