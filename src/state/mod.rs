//! Client state: the persisted identity hint, form state, and the balance
//! disclosure machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything here is plain data plus transition functions. The controllers in
//! `pages` own instances of these types and decide when transitions happen.

pub mod disclosure;
pub mod forms;
pub mod session;
