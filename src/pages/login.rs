//! Login view controller.
//!
//! Login never disables its submit control: pressing it again while a request
//! is in flight sends another one (see [`FormBehavior::LOGIN`]). The first
//! success wins; later completions cannot navigate a second time.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use std::sync::{Arc, Mutex};

use super::{Submission, lock};
use crate::app::AppContext;
use crate::net::types::LoginCredentials;
use crate::route::Route;
use crate::state::forms::{FormBehavior, FormErrors, FormPhase, SubmitOutcome, require};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const LOGIN_ERROR_TOAST: &str = "Invalid username or password";

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub credentials: LoginCredentials,
    pub errors: FormErrors,
    pub phase: FormPhase,
    pub password_visible: bool,
    in_flight: usize,
}

impl LoginForm {
    /// Toast text while a general error is present.
    #[must_use]
    pub fn toast(&self) -> Option<&'static str> {
        self.errors.general().map(|_| LOGIN_ERROR_TOAST)
    }
}

#[derive(Clone)]
pub struct LoginPage {
    ctx: AppContext,
    form: Arc<Mutex<LoginForm>>,
}

impl LoginPage {
    pub const BEHAVIOR: FormBehavior = FormBehavior::LOGIN;

    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx, form: Arc::new(Mutex::new(LoginForm::default())) }
    }

    #[must_use]
    pub fn form(&self) -> LoginForm {
        lock(&self.form).clone()
    }

    pub fn set_username(&self, value: impl Into<String>) {
        lock(&self.form).credentials.username = value.into();
    }

    pub fn set_password(&self, value: impl Into<String>) {
        lock(&self.form).credentials.password = value.into();
    }

    pub fn toggle_password_visibility(&self) -> bool {
        let mut form = lock(&self.form);
        form.password_visible = !form.password_visible;
        form.password_visible
    }

    /// Login shows no spinner.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        Self::BEHAVIOR.shows_loading && lock(&self.form).phase == FormPhase::Submitting
    }

    #[must_use]
    pub fn submit_disabled(&self) -> bool {
        Self::BEHAVIOR.blocks_resubmit && lock(&self.form).phase == FormPhase::Submitting
    }

    /// Press "Sign In".
    pub fn submit(&self) -> Submission {
        let credentials = {
            let mut guard = lock(&self.form);
            let form = &mut *guard;
            let blocked = Self::BEHAVIOR.blocks_resubmit && form.phase == FormPhase::Submitting;
            if blocked || form.phase == FormPhase::Success {
                return Submission::Settled(SubmitOutcome::Ignored);
            }
            form.errors.clear();
            require(&mut form.errors, "username", &form.credentials.username);
            require(&mut form.errors, "password", &form.credentials.password);
            if !form.errors.is_empty() {
                return Submission::Settled(SubmitOutcome::Invalid);
            }
            form.phase = FormPhase::Submitting;
            form.in_flight += 1;
            form.credentials.clone()
        };

        tracing::debug!(username = %credentials.username, "login submitted");
        let ctx = self.ctx.clone();
        let form = Arc::clone(&self.form);
        Submission::Pending(tokio::spawn(async move { run_login(ctx, form, credentials).await }))
    }
}

async fn run_login(ctx: AppContext, form: Arc<Mutex<LoginForm>>, credentials: LoginCredentials) -> SubmitOutcome {
    let result = ctx.gateway.login(&credentials).await;

    let mut state = lock(&form);
    state.in_flight = state.in_flight.saturating_sub(1);
    if state.phase == FormPhase::Success {
        return SubmitOutcome::Ignored;
    }

    match result {
        Ok(session) => {
            tracing::info!(username = %session.username, role = %session.role, "login succeeded");
            ctx.session.set(&session);
            state.errors.clear();
            state.phase = FormPhase::Success;
            drop(state);
            ctx.navigator.navigate(Route::Dashboard);
            SubmitOutcome::Success
        }
        Err(err) => {
            tracing::info!(error = %err, "login failed");
            state.errors.clear();
            state.errors.set_general(err.server_message().unwrap_or(LOGIN_FAILED_MESSAGE));
            if state.in_flight == 0 {
                state.phase = FormPhase::Editing;
            }
            SubmitOutcome::Failed
        }
    }
}
