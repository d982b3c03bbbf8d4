//! Shared data model for the `TermBoard` REST API.
//!
//! These types mirror the JSON wire format of the remote service exactly.
//! Both the client crate and the in-memory mock server build on them, so a
//! field rename here is a wire-format change.

pub mod envelope;
pub mod project;
pub mod task;
pub mod user;
