//! Domain logic for the evaluation checklist engine.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the API, and any future CLI tooling. Everything in here
//! is pure: tree sanitization, tree editing, response validation, the
//! evaluation state machine, and period-key computation.

pub mod checklist;
pub mod error;
pub mod lifecycle;
pub mod period;
pub mod roles;
pub mod types;
