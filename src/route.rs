//! Client routes and the navigation seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! Controllers never switch views themselves; they ask a [`Navigator`]. The
//! CLI wires a [`ChannelNavigator`] and reacts to the routes it receives.

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

use tokio::sync::mpsc;

/// Views the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
}

impl Route {
    /// URL path of the view.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
        }
    }

    /// Parse a URL path. `/` maps to the login view.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" | "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }

    /// Whether the view needs a session to render.
    #[must_use]
    pub fn requires_session(self) -> bool {
        matches!(self, Self::Dashboard)
    }
}

/// Receives navigation requests from controllers.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Forwards navigation requests over an unbounded channel.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(path = route.path(), "navigate");
        if self.tx.send(route).is_err() {
            tracing::warn!(path = route.path(), "navigation dropped: receiver closed");
        }
    }
}
