use std::ops::{BitOr, BitOrAssign};

use graph_hash::CommitId;

use crate::color::LaneColor;

/// How a lane is drawn at one row: a plain passthrough, a terminus where a
/// collapsed branch leaves the visible graph, a start where it re-enters,
/// or a combination.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LaneKind(u8);

impl LaneKind {
    /// Plain lane segment.
    pub const NONE: LaneKind = LaneKind(0);
    /// Newest edge of a pruned lane: the branch re-enters below this row.
    pub const START: LaneKind = LaneKind(1);
    /// Oldest edge of a pruned lane: the branch left the graph above here.
    pub const END: LaneKind = LaneKind(1 << 1);

    pub fn contains(self, other: LaneKind) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LaneKind {
    type Output = LaneKind;
    fn bitor(self, rhs: LaneKind) -> LaneKind {
        LaneKind(self.0 | rhs.0)
    }
}

impl BitOrAssign for LaneKind {
    fn bitor_assign(&mut self, rhs: LaneKind) {
        self.0 |= rhs.0;
    }
}

/// One lane's drawn state for one row.
///
/// `from` lists the columns of the immediately preceding row that feed into
/// this lane (a single entry for a passthrough, several after a merge).
/// A lane with `boundary` set marks a collapse/expand seam and carries the
/// commit id on the far side of it.
///
/// `Clone` shares the color with the original, so a later merge recolor of
/// the live lane re-hues every cloned snapshot of the same segment; the
/// `from` list and kind are independent copies. Use [`Lane::dup`] for a
/// fully independent value.
#[derive(Clone, Debug)]
pub struct Lane {
    pub color: LaneColor,
    pub kind: LaneKind,
    pub from: Vec<usize>,
    pub boundary: Option<CommitId>,
}

impl Lane {
    /// Create a plain lane with no incoming columns.
    pub fn new(color: LaneColor) -> Self {
        Self {
            color,
            kind: LaneKind::NONE,
            from: Vec::new(),
            boundary: None,
        }
    }

    /// Create a plain lane fed by the given previous-row columns.
    pub fn with_from(color: LaneColor, from: Vec<usize>) -> Self {
        Self {
            color,
            kind: LaneKind::NONE,
            from,
            boundary: None,
        }
    }

    /// Copy the lane with an independent color.
    pub fn dup(&self) -> Self {
        Self {
            color: self.color.copy(),
            kind: self.kind,
            from: self.from.clone(),
            boundary: self.boundary,
        }
    }

    /// Turn the lane into a collapse/expand seam of the given kind,
    /// carrying the commit id on the far side.
    pub fn into_boundary(mut self, kind: LaneKind, id: CommitId) -> Self {
        self.kind |= kind;
        self.boundary = Some(id);
        self
    }

    /// Whether this lane marks a collapse/expand seam.
    pub fn is_boundary(&self) -> bool {
        self.boundary.is_some()
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
    fn kind_combinations() {
        let both = LaneKind::START | LaneKind::END;
        assert!(both.contains(LaneKind::START));
        assert!(both.contains(LaneKind::END));
        assert!(!LaneKind::START.contains(LaneKind::END));
        assert!(LaneKind::NONE.is_none());
        assert!(!both.is_none());

        let mut kind = LaneKind::NONE;
        kind |= LaneKind::END;
        assert_eq!(kind, LaneKind::END);
    }

    #[test]
    fn clone_shares_color_dup_does_not() {
        let mut cycle = ColorCycle::new();
        let lane = Lane::with_from(cycle.next(), vec![0]);
        let cloned = lane.clone();
        let dupped = lane.dup();

        assert!(lane.color.shares_with(&cloned.color));
        assert!(!lane.color.shares_with(&dupped.color));
        assert_eq!(dupped.color.index(), lane.color.index());
        assert_eq!(cloned.from, vec![0]);
    }

    #[test]
    fn boundary_conversion_keeps_lane_state() {
        let mut cycle = ColorCycle::new();
        let lane = Lane::with_from(cycle.next(), vec![2]);
        let boundary = lane.into_boundary(LaneKind::END, id(9));

        assert!(boundary.is_boundary());
        assert!(boundary.kind.contains(LaneKind::END));
        assert_eq!(boundary.boundary, Some(id(9)));
        assert_eq!(boundary.from, vec![2]);
    }
}
