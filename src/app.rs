//! Shared client context handed to every controller.
//!
//! DESIGN
//! ======
//! `AppContext` is the explicit replacement for ambient globals: the gateway,
//! the session store, navigation, and visual effects all arrive through it.
//! Clone is cheap; every field is an `Arc` or wraps one.

use std::sync::Arc;

use crate::net::api::Gateway;
use crate::route::Navigator;
use crate::state::session::SessionStore;
use crate::util::confetti::Celebration;

#[derive(Clone)]
pub struct AppContext {
    pub gateway: Arc<dyn Gateway>,
    pub session: SessionStore,
    pub navigator: Arc<dyn Navigator>,
    pub effects: Arc<dyn Celebration>,
}

impl AppContext {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn Gateway>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        effects: Arc<dyn Celebration>,
    ) -> Self {
        Self { gateway, session, navigator, effects }
    }
}
