//! dtree core library — directory-tree traversal and per-entry actions.
//!
//! `dtree-core` walks a directory tree once, physically and depth-first, and
//! applies one action to every entry it meets. The command-line frontend
//! (`dtree-cli`) only selects the action and prints the result.
//!
//! # Modules
//!
//! - [`fs`] — Walk engine, entry model, extension filters, destination paths, primitive file operations.
//! - [`action`] — The eight operations, their shared [`OperationContext`], and [`run`].
//! - [`config`] — Walk settings ([`WalkConfig`]).
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod action;
pub mod config;
pub mod error;
pub mod fs;

pub use action::{run, ActionVisitor, Counters, Operation, OperationContext, Report};
pub use config::WalkConfig;
pub use error::{CoreError, CoreResult};
pub use fs::{Entry, EntryKind, EntryVisitor, Extension, VisitOutcome, WalkSummary, Walker};
