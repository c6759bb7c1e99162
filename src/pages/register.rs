//! Registration view controller.
//!
//! Unlike login, registration shows a spinner and disables its submit control
//! while a request is in flight. A successful registration does not sign the
//! user in: it shows a confirmation and returns to login after a short pause.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Submission, lock};
use crate::app::AppContext;
use crate::net::api::ApiError;
use crate::net::types::Registration;
use crate::route::Route;
use crate::state::forms::{
    FormBehavior, FormErrors, FormPhase, INVALID_EMAIL_MESSAGE, SubmitOutcome, looks_like_email, require,
};
use crate::state::session::Role;
use crate::util::schedule;

pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";
pub const REGISTERED_NOTICE: &str = "Account created successfully";
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub fields: Registration,
    pub errors: FormErrors,
    pub phase: FormPhase,
    pub password_visible: bool,
    /// Confirmation shown after success.
    pub notice: Option<&'static str>,
}

impl RegisterForm {
    /// Every account is a customer account.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::Customer
    }
}

/// Form field a value is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    Password,
    Phone,
}

#[derive(Clone)]
pub struct RegisterPage {
    ctx: AppContext,
    form: Arc<Mutex<RegisterForm>>,
}

impl RegisterPage {
    pub const BEHAVIOR: FormBehavior = FormBehavior::REGISTER;

    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx, form: Arc::new(Mutex::new(RegisterForm::default())) }
    }

    #[must_use]
    pub fn form(&self) -> RegisterForm {
        lock(&self.form).clone()
    }

    /// Edit one field. Other fields and their errors are left alone.
    pub fn set(&self, field: Field, value: impl Into<String>) {
        let mut form = lock(&self.form);
        let slot = match field {
            Field::Username => &mut form.fields.username,
            Field::Email => &mut form.fields.email,
            Field::Password => &mut form.fields.password,
            Field::Phone => &mut form.fields.phone,
        };
        *slot = value.into();
    }

    pub fn toggle_password_visibility(&self) -> bool {
        let mut form = lock(&self.form);
        form.password_visible = !form.password_visible;
        form.password_visible
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        Self::BEHAVIOR.shows_loading && lock(&self.form).phase == FormPhase::Submitting
    }

    #[must_use]
    pub fn submit_disabled(&self) -> bool {
        Self::BEHAVIOR.blocks_resubmit && lock(&self.form).phase == FormPhase::Submitting
    }

    /// Press "Create Account".
    pub fn submit(&self) -> Submission {
        let registration = {
            let mut guard = lock(&self.form);
            let form = &mut *guard;
            let blocked = Self::BEHAVIOR.blocks_resubmit && form.phase == FormPhase::Submitting;
            if blocked || form.phase == FormPhase::Success {
                return Submission::Settled(SubmitOutcome::Ignored);
            }
            form.errors.clear();
            validate(&form.fields, &mut form.errors);
            if !form.errors.is_empty() {
                return Submission::Settled(SubmitOutcome::Invalid);
            }
            form.phase = FormPhase::Submitting;
            form.fields.clone()
        };

        tracing::debug!(username = %registration.username, "registration submitted");
        let ctx = self.ctx.clone();
        let form = Arc::clone(&self.form);
        Submission::Pending(tokio::spawn(async move { run_register(ctx, form, registration).await }))
    }
}

fn validate(fields: &Registration, errors: &mut FormErrors) {
    require(errors, "username", &fields.username);
    require(errors, "email", &fields.email);
    require(errors, "password", &fields.password);
    if errors.field("email").is_none() && !looks_like_email(&fields.email) {
        errors.set_field("email", INVALID_EMAIL_MESSAGE);
    }
}

async fn run_register(ctx: AppContext, form: Arc<Mutex<RegisterForm>>, registration: Registration) -> SubmitOutcome {
    let result = ctx.gateway.register(&registration).await;

    let mut state = lock(&form);
    match result {
        Ok(()) => {
            tracing::info!(username = %registration.username, "registration succeeded");
            state.phase = FormPhase::Success;
            state.notice = Some(REGISTERED_NOTICE);
            drop(state);
            let navigator = Arc::clone(&ctx.navigator);
            schedule::after(REDIRECT_DELAY, move || navigator.navigate(Route::Login));
            SubmitOutcome::Success
        }
        Err(err) => {
            tracing::info!(error = %err, "registration failed");
            state.errors = errors_for(&err);
            state.phase = FormPhase::Editing;
            SubmitOutcome::Failed
        }
    }
}

/// Map a gateway failure onto the form: field messages when the server named
/// fields, otherwise one general message.
fn errors_for(err: &ApiError) -> FormErrors {
    match err {
        ApiError::Validation(fields) => FormErrors::from_fields(fields.clone()),
        other => FormErrors::general_only(other.server_message().unwrap_or(REGISTRATION_FAILED_MESSAGE)),
    }
}
