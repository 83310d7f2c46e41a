use std::collections::HashMap;

use graph_hash::CommitId;

use crate::color::LaneColor;

/// The saved state of a lane pruned from the active set while still
/// logically pending.
#[derive(Clone, Debug)]
pub struct CollapsedLane {
    /// Color the lane was drawn with; reinstated on expansion.
    pub color: LaneColor,
    /// Column the lane occupied when it was collapsed.
    pub index: usize,
    /// Commit the lane most recently departed from (the child side).
    pub from: CommitId,
    /// Commit the lane is waiting for (the parent side).
    pub to: CommitId,
}

/// Table of collapsed lanes, keyed by the commit id each lane awaits.
///
/// Keys are compared by the 20-byte value, so an id copied across
/// structures still finds its entry.
#[derive(Debug, Default)]
pub struct CollapsedLanes {
    inner: HashMap<CommitId, CollapsedLane>,
}

impl CollapsedLanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a lane under the commit id it awaits. A previous entry awaiting
    /// the same id is replaced.
    pub fn insert(&mut self, lane: CollapsedLane) {
        self.inner.insert(lane.to, lane);
    }

    /// Remove and return the lane awaiting `id`, if any.
    pub fn take(&mut self, id: &CommitId) -> Option<CollapsedLane> {
        self.inner.remove(id)
    }

    pub fn contains(&self, id: &CommitId) -> bool {
        self.inner.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
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
    fn insert_take_roundtrip() {
        let mut cycle = ColorCycle::new();
        let mut table = CollapsedLanes::new();
        table.insert(CollapsedLane {
            color: cycle.next(),
            index: 3,
            from: id(1),
            to: id(2),
        });

        assert!(table.contains(&id(2)));
        assert_eq!(table.len(), 1);

        let lane = table.take(&id(2)).unwrap();
        assert_eq!(lane.index, 3);
        assert_eq!(lane.from, id(1));
        assert!(table.is_empty());
        assert!(table.take(&id(2)).is_none());
    }

    #[test]
    fn lookup_is_by_value() {
        let mut cycle = ColorCycle::new();
        let mut table = CollapsedLanes::new();
        table.insert(CollapsedLane {
            color: cycle.next(),
            index: 0,
            from: id(1),
            to: id(2),
        });

        // a freshly constructed id with the same bytes hits the entry
        let copy = CommitId::from_bytes(id(2).as_bytes()).unwrap();
        assert!(table.take(&copy).is_some());
    }

    #[test]
    fn reinsert_replaces() {
        let mut cycle = ColorCycle::new();
        let mut table = CollapsedLanes::new();
        for index in [1, 5] {
            table.insert(CollapsedLane {
                color: cycle.next(),
                index,
                from: id(1),
                to: id(2),
            });
        }
        assert_eq!(table.len(), 1);
        assert_eq!(table.take(&id(2)).unwrap().index, 5);
    }
}
