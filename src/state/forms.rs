//! Shared form state for the login and registration views.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::collections::BTreeMap;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address";

/// Per-field messages plus one optional form-wide message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, String>,
    general: Option<String>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn general_only(message: impl Into<String>) -> Self {
        Self { fields: BTreeMap::new(), general: Some(message.into()) }
    }

    #[must_use]
    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields, general: None }
    }

    pub fn set_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(field.into(), message.into());
    }

    pub fn set_general(&mut self, message: impl Into<String>) {
        self.general = Some(message.into());
    }

    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn general(&self) -> Option<&str> {
        self.general.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of messages, general included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.general.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.general = None;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    /// Terminal: the form has been accepted.
    Success,
}

/// Per-form knobs for behavior that differs between login and registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormBehavior {
    /// Show a spinner on the submit control while submitting.
    pub shows_loading: bool,
    /// Disable the submit control while submitting.
    pub blocks_resubmit: bool,
}

impl FormBehavior {
    pub const LOGIN: Self = Self { shows_loading: false, blocks_resubmit: false };
    pub const REGISTER: Self = Self { shows_loading: true, blocks_resubmit: true };
}

/// What a submit action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the server.
    Success,
    /// Rejected by the server or unreachable; back to editing with errors.
    Failed,
    /// Incomplete form; nothing was sent.
    Invalid,
    /// Dropped because a submission is in flight or the form already succeeded.
    Ignored,
}

/// Record a required-field error when `value` is blank.
pub(crate) fn require(errors: &mut FormErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.set_field(field, REQUIRED_MESSAGE);
    }
}

/// Loose `local@domain.tld` shape check, enough to catch typos.
#[must_use]
pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}
