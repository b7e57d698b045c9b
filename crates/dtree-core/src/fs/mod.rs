//! File system layer for dtree.
//!
//! This module provides the walk engine ([`walk::Walker`]), the entry model
//! ([`entry::Entry`]), extension filters ([`extension::Extension`]),
//! destination-path construction ([`dest::DestinationMapper`]) and the
//! primitive side effects the actions perform ([`ops`]).

pub mod dest;
pub mod entry;
pub mod extension;
pub mod ops;
pub mod walk;

pub use dest::{ensure_disjoint, DestinationMapper};
pub use entry::{Entry, EntryKind};
pub use extension::Extension;
pub use walk::{EntryVisitor, VisitOutcome, WalkSummary, Walker};
