//! Incremental lane layout for commit-graph rendering.
//!
//! Commits arrive one at a time in traversal order (reverse chronological or
//! topological), each carrying its id and ordered parent ids. For every
//! commit, [`Lanes::next`] returns the row of [`Lane`] values to draw for it
//! (one per active column, left to right) plus the column of the commit
//! itself, and updates the internal state for the next commit.
//!
//! Long-inactive side branches are collapsed out of the active set into a
//! table keyed by the commit id they are waiting for, and expanded back in
//! when that id arrives. Both operations rewrite the bounded window of
//! recently emitted rows the allocator retains, splicing the lane out of or
//! back into history and marking the seam with a boundary lane.
//!
//! The allocator is single-threaded and not reentrant; all mutable state is
//! owned by one [`Lanes`] instance. The only shared-ownership value is the
//! lane color, which emitted rows may share with the live lane so that a
//! later merge recolor applies to the whole drawn segment.

mod collapsed;
mod color;
mod config;
mod lane;
mod lanes;
mod row;

pub use collapsed::{CollapsedLane, CollapsedLanes};
pub use color::{ColorCycle, LaneColor, PALETTE_SIZE};
pub use config::LanesConfig;
pub use lane::{Lane, LaneKind};
pub use lanes::{Lanes, MAX_LANES};
pub use row::{GraphRow, Revision, RowHandle};

use graph_hash::CommitId;

/// Errors produced by the lane allocator.
///
/// All of these are programming-contract violations surfaced to the caller;
/// the engine has no I/O and no transient failures.
#[derive(Debug, thiserror::Error)]
pub enum LanesError {
    /// Two active lanes simultaneously expect the same commit id: the
    /// traversal delivered a duplicate commit or ran out of order.
    #[error("duplicate lane expectation for commit {0}")]
    DuplicateExpectation(CommitId),

    /// The active width would exceed [`MAX_LANES`].
    #[error("active lane count {0} exceeds the supported maximum")]
    TooManyLanes(usize),

    /// The tunables in [`LanesConfig`] are inconsistent.
    #[error("invalid lane configuration: {0}")]
    Config(String),
}
