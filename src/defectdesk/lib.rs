//! # Defectdesk Architecture
//!
//! Defectdesk records defective goods received at a warehouse: which
//! manufacturer delivered them, on which date, and photographic plus textual
//! evidence for each faulty item. The filesystem is the source of truth; the
//! reception catalog is an index over it that gets rebuilt whenever the two
//! disagree.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, owns stdout/stderr     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, returns CmdResult             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per user operation                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (reconcile.rs, evidence.rs)                         │
//! │  - Catalog/disk reconciliation, evidence file layout        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Storage (roots/, scanner.rs, catalog.rs, store/)           │
//! │  - Root probing and resolution, directory scan, KV catalog  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## On-disk layout
//!
//! ```text
//! <base root>/<manufacturer>/<DD-MM-YYYY>/<category>/<article>-<n>/
//!     box-<article>-<n>.jpg
//!     product-<article>-<n>.jpg
//!     <article>-<n>.txt
//! ```
//!
//! The base root is picked once per session (see [`roots`]). Reception
//! directories found under it are adopted into the catalog; catalog entries
//! whose directory is gone are dropped.
//!
//! ## No I/O assumptions in core
//!
//! From `api.rs` inward nothing prints or exits. Diagnostics go through
//! `tracing`; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Per-operation logic
//! - [`reconcile`]: Catalog and disk reconciliation
//! - [`evidence`]: Photo placement and the trilingual evidence text
//! - [`roots`]: Candidate storage roots, write probing, path resolution
//! - [`scanner`]: Rebuilds reception records from the directory tree
//! - [`catalog`]: Persisted reception list
//! - [`store`]: Key-value persistence backends
//! - [`model`]: Receptions, items, categories, validators
//! - [`config`]: Configuration
//! - [`init`]: Platform directories and context setup
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod evidence;
pub mod init;
pub mod model;
pub mod reconcile;
pub mod roots;
pub mod scanner;
pub mod store;
