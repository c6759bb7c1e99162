//! KodBank client core: session store, API gateway, and the auth and
//! balance-disclosure controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendering is left to the caller (the `kodbank-cli` crate is one). Every
//! controller here is an explicit state machine that talks to the outside world
//! only through the collaborators bundled in [`app::AppContext`]: a
//! [`net::api::Gateway`], a [`state::session::SessionStore`], a
//! [`route::Navigator`], and a [`util::confetti::Celebration`] effect.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod route;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::AppContext;
pub use config::ClientConfig;
pub use route::Route;
