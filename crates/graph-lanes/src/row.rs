use std::cell::RefCell;
use std::rc::Rc;

use graph_hash::CommitId;

use crate::lane::Lane;

/// Shared handle to a traversal row.
///
/// The allocator retains a clone of the handle for every row inside its
/// window and drops it on eviction or reset; the external row store keeps
/// its own handle for the row's primary lifetime.
pub type RowHandle<R> = Rc<RefCell<R>>;

/// The storage contract a traversal row must offer the lane allocator.
///
/// The allocator reads the commit id and parent ids once per call, and may
/// rewrite the stored lane list and own-lane column of any row still inside
/// its window when a collapse or expansion splices a lane out of or back
/// into history. A rewritten lane list replaces the previous one outright.
pub trait GraphRow {
    /// The 20-byte id of this row's commit.
    fn id(&self) -> CommitId;

    /// The ordered parent ids (empty for a root commit).
    fn parents(&self) -> &[CommitId];

    /// The lane list currently stored for this row.
    fn lanes(&self) -> Vec<Lane>;

    /// Replace the stored lane list.
    fn set_lanes(&mut self, lanes: Vec<Lane>);

    /// Column of this row's own commit.
    fn own_column(&self) -> usize;

    /// Move this row's own commit to another column.
    fn set_own_column(&mut self, column: usize);
}

/// A ready-made traversal row: commit identity plus the mutable layout
/// fields the allocator maintains.
#[derive(Clone, Debug)]
pub struct Revision {
    id: CommitId,
    parents: Vec<CommitId>,
    lanes: Vec<Lane>,
    own_column: usize,
}

impl Revision {
    pub fn new(id: CommitId, parents: Vec<CommitId>) -> Self {
        Self {
            id,
            parents,
            lanes: Vec::new(),
            own_column: 0,
        }
    }

    /// Wrap the revision in a shared row handle.
    pub fn into_handle(self) -> RowHandle<Self> {
        Rc::new(RefCell::new(self))
    }
}

impl GraphRow for Revision {
    fn id(&self) -> CommitId {
        self.id
    }

    fn parents(&self) -> &[CommitId] {
        &self.parents
    }

    fn lanes(&self) -> Vec<Lane> {
        self.lanes.clone()
    }

    fn set_lanes(&mut self, lanes: Vec<Lane>) {
        self.lanes = lanes;
    }

    fn own_column(&self) -> usize {
        self.own_column
    }

    fn set_own_column(&mut self, column: usize) {
        self.own_column = column;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorCycle;

    fn id(n: u8) -> CommitId {
        CommitId::from([n; 20])
    }

    #[test]
    fn revision_stores_layout_fields() {
        let mut rev = Revision::new(id(1), vec![id(2), id(3)]);
        assert_eq!(rev.id(), id(1));
        assert_eq!(rev.parents(), &[id(2), id(3)]);
        assert!(rev.lanes().is_empty());

        let mut cycle = ColorCycle::new();
        rev.set_lanes(vec![Lane::new(cycle.next())]);
        rev.set_own_column(4);
        assert_eq!(rev.lanes().len(), 1);
        assert_eq!(rev.own_column(), 4);
    }

    #[test]
    fn handle_shares_one_row() {
        let handle = Revision::new(id(1), vec![]).into_handle();
        let retained = Rc::clone(&handle);
        retained.borrow_mut().set_own_column(2);
        assert_eq!(handle.borrow().own_column(), 2);
        assert_eq!(Rc::strong_count(&handle), 2);
        drop(retained); // release
        assert_eq!(Rc::strong_count(&handle), 1);
    }
}
