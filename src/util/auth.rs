//! Shared auth helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authenticated views apply identical redirect behavior: no persisted
//! session means the login view, and an auth failure means ejection.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::app::AppContext;
use crate::route::Route;
use crate::state::session::{Session, SessionStore};

/// Whether `route` must bounce to login given the current store contents.
#[must_use]
pub fn should_redirect_unauth(route: Route, session: &SessionStore) -> bool {
    route.requires_session() && session.current().is_none()
}

/// Session for an authenticated view, or a redirect to login when absent.
pub fn require_session(ctx: &AppContext) -> Option<Session> {
    let session = ctx.session.current();
    if session.is_none() {
        tracing::info!("no session; redirecting to login");
        ctx.navigator.navigate(Route::Login);
    }
    session
}

/// Forget the session and send the user to login.
pub fn eject(ctx: &AppContext, reason: &str) {
    tracing::info!(reason, "ejecting to login");
    ctx.session.clear();
    ctx.navigator.navigate(Route::Login);
}
