//! SECURE 2.0 payroll preflight engine
//!
//! This crate checks a batch of payroll records against SECURE 2.0
//! retirement-plan rules (Roth-only catch-up for HCEs, auto-enrollment,
//! escalation and long-term part-time eligibility) and produces a
//! GREEN / YELLOW / RED verdict with a list of findings.
//!
//! The core is [`engine::evaluate`], a pure function over a validated
//! [`models::PayrollBatch`] and a [`config::PreflightConfig`]. The `io`,
//! `api` and `watcher` modules are thin layers around it.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod models;
pub mod rules;
pub mod watcher;
