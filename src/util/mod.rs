//! Small helpers shared by the controllers and the CLI.

pub mod auth;
pub mod confetti;
pub mod format;
pub mod schedule;
