//! Networking modules for the KodBank HTTP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the [`api::Gateway`] seam and its `reqwest` implementation;
//! `types` defines the shared wire schema.

pub mod api;
pub mod types;
