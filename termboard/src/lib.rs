//! `TermBoard` -- terminal-native kanban board client library.

pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod net;
pub mod selector;
pub mod session;
pub mod ui;
