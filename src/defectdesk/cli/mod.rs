//! # CLI Layer
//!
//! One UI client for defectdesk. This is the only place that parses
//! arguments, writes to stdout/stderr or decides exit codes.
//!
//! - `setup`: clap definitions
//! - `commands`: `run()` dispatch and per-command handlers
//! - `render`: turns a `CmdResult` into terminal output

pub mod commands;
pub mod render;
pub mod setup;
