//! # Runtime
//!
//! Process-level setup for the deployment binary.

pub mod initialization;
