//! `TermBoard` mock API server library.
//!
//! An axum implementation of the remote service contract, held entirely in
//! memory. Integration tests embed it on an OS-assigned port; it also runs
//! standalone as a local development backend. Fault injection hooks on
//! [`state::MockState`] let tests exercise rollback and slow-load paths.

pub mod config;
pub mod server;
pub mod state;
