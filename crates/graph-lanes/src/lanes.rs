//! The lane allocator: one `next()` call per commit in traversal order.

use std::collections::VecDeque;
use std::rc::Rc;

use graph_hash::CommitId;

use crate::collapsed::{CollapsedLane, CollapsedLanes};
use crate::color::{ColorCycle, LaneColor};
use crate::config::LanesConfig;
use crate::lane::{Lane, LaneKind};
use crate::row::{GraphRow, RowHandle};
use crate::LanesError;

/// Upper bound on the active width.
///
/// Column positions fit comfortably in 16 bits; instead of narrowing the
/// stored index type, the allocator refuses to grow past this and reports
/// [`LanesError::TooManyLanes`]. No real repository approaches 65 535
/// concurrently open lines of history.
pub const MAX_LANES: usize = u16::MAX as usize;

/// Bookkeeping for one active column.
///
/// The container's position in the active list is its column. `to` is the
/// commit the lane is waiting for (cleared while the lane is stopped at the
/// current commit), `from` the commit it most recently departed from, and
/// `inactive` counts rows since the lane last stopped or merged. A freshly
/// expanded lane starts `inactive` below zero so it has to stay quiet for
/// the re-collapse gap on top of the threshold before collapsing again.
struct LaneContainer {
    lane: Lane,
    to: Option<CommitId>,
    from: CommitId,
    inactive: i64,
}

impl LaneContainer {
    fn new(to: Option<CommitId>, from: CommitId, color: LaneColor) -> Self {
        Self {
            lane: Lane::new(color),
            to,
            from,
            inactive: 0,
        }
    }

    /// Replace the lane with a passthrough for the next row and age it.
    fn step(&mut self, column: usize) {
        let color = self.lane.color.clone();
        self.lane = Lane::with_from(color, vec![column]);
        self.inactive += 1;
    }

    /// Mark the lane active. A counter still below zero keeps its remaining
    /// re-collapse debt from the expansion that produced it.
    fn reset_inactivity(&mut self) {
        self.inactive = self.inactive.min(0);
    }
}

/// The incremental lane layout engine.
///
/// Owns the ordered active containers (position = column), the bounded
/// window of recently emitted rows, the collapsed-lane table, and the color
/// rotation. Not reentrant: one instance, one traversal, one call to
/// [`Lanes::next`] per commit.
pub struct Lanes<R: GraphRow> {
    config: LanesConfig,
    colors: ColorCycle,
    /// Active containers; index in this list is the column index.
    lanes: Vec<LaneContainer>,
    /// Retained rows, newest first.
    previous: VecDeque<RowHandle<R>>,
    /// Lanes pruned from the active set, keyed by the commit they await.
    collapsed: CollapsedLanes,
}

impl<R: GraphRow> Lanes<R> {
    /// Create an allocator with the default tunables.
    pub fn new() -> Self {
        Self {
            config: LanesConfig::default(),
            colors: ColorCycle::new(),
            lanes: Vec::new(),
            previous: VecDeque::new(),
            collapsed: CollapsedLanes::new(),
        }
    }

    /// Create an allocator with explicit tunables.
    pub fn with_config(config: LanesConfig) -> Result<Self, LanesError> {
        config.validate()?;
        Ok(Self {
            config,
            colors: ColorCycle::new(),
            lanes: Vec::new(),
            previous: VecDeque::new(),
            collapsed: CollapsedLanes::new(),
        })
    }

    /// Process the next commit of the traversal.
    ///
    /// Returns the row of lanes to draw for this commit (left to right) and
    /// the column of the commit's own lane. The emitted row and own column
    /// are also written back into `revision`, and the allocator retains a
    /// handle to the row so a later collapse or expansion can rewrite it
    /// while it remains inside the window.
    pub fn next(&mut self, revision: &RowHandle<R>) -> Result<(Vec<Lane>, usize), LanesError> {
        let (id, parents) = {
            let row = revision.borrow();
            (row.id(), row.parents().to_vec())
        };

        self.collapse_lanes();
        self.expand_lanes(&id, &parents)?;

        let own = match self.find_lane(&id)? {
            Some(position) => {
                let container = &mut self.lanes[position];
                // a stop always gets an independent color instance
                container.lane.color = container.lane.color.copy();
                container.to = None;
                container.reset_inactivity();
                position
            }
            None => {
                // nothing expected this commit: it roots a new lane
                self.ensure_width(self.lanes.len() + 1)?;
                self.lanes
                    .push(LaneContainer::new(None, id, self.colors.next()));
                self.lanes.len() - 1
            }
        };

        let row: Vec<Lane> = self.lanes.iter().map(|c| c.lane.clone()).collect();

        {
            let mut stored = revision.borrow_mut();
            stored.set_lanes(row.clone());
            stored.set_own_column(own);
        }
        while self.previous.len() >= self.config.window_capacity() {
            // evict and release the oldest retained row
            self.previous.pop_back();
        }
        self.previous.push_front(Rc::clone(revision));

        self.prepare_lanes(id, &parents, own)?;

        Ok((row, own))
    }

    /// Drop all allocator state: active lanes, retained rows, collapsed
    /// table, and the color rotation. Call when the traversal restarts.
    pub fn reset(&mut self) {
        self.lanes.clear();
        self.colors.reset();
        self.previous.clear();
        self.collapsed.clear();
    }

    /// Current number of active columns.
    pub fn width(&self) -> usize {
        self.lanes.len()
    }

    /// Number of lanes currently parked in the collapsed table.
    pub fn collapsed_len(&self) -> usize {
        self.collapsed.len()
    }

    /// Check whether a pruned lane is waiting for `id`.
    pub fn is_collapsed(&self, id: &CommitId) -> bool {
        self.collapsed.contains(id)
    }

    /// Find the active column expecting `id`, erroring if more than one
    /// does (a duplicate commit or out-of-order traversal).
    fn find_lane(&self, id: &CommitId) -> Result<Option<usize>, LanesError> {
        let mut found = None;
        for (position, container) in self.lanes.iter().enumerate() {
            if container.to.as_ref() == Some(id) {
                if found.is_some() {
                    return Err(LanesError::DuplicateExpectation(*id));
                }
                found = Some(position);
            }
        }
        Ok(found)
    }

    fn ensure_width(&self, width: usize) -> Result<(), LanesError> {
        if width > MAX_LANES {
            return Err(LanesError::TooManyLanes(width));
        }
        Ok(())
    }

    /// Prune every lane that has been quiet for the collapse threshold.
    fn collapse_lanes(&mut self) {
        let threshold = i64::from(self.config.collapse_threshold);
        let mut column = 0;
        while column < self.lanes.len() {
            match (self.lanes[column].inactive == threshold, self.lanes[column].to) {
                (true, Some(to)) => {
                    let container = self.lanes.remove(column);
                    // the active index drifts left of the lane's column in
                    // the newest retained row when a terminated lane was
                    // dropped after that row was emitted; the passthrough's
                    // from entry still holds the row's real column
                    let row_column = container.lane.from.first().copied().unwrap_or(column);
                    if self.previous.len() > 1 {
                        shift_from_for_removal(
                            self.lanes.iter_mut().map(|c| &mut c.lane),
                            row_column,
                        );
                    }
                    self.collapse_lane(container, row_column, to);
                }
                _ => column += 1,
            }
        }
    }

    /// Remove one pruned lane from every retained row, chasing its column
    /// backwards through the window. The oldest retained row keeps the lane
    /// as a permanent `END` boundary carrying the awaited commit id.
    fn collapse_lane(&mut self, container: LaneContainer, column: usize, to: CommitId) {
        self.collapsed.insert(CollapsedLane {
            color: container.lane.color.clone(),
            index: column,
            from: container.from,
            to,
        });

        let mut column = column;
        let depth = self.previous.len();
        for (i, row) in self.previous.iter().enumerate() {
            let mut stored = row.borrow_mut();
            let mut lanes = stored.lanes();
            if column >= lanes.len() {
                break;
            }
            if i + 1 < depth {
                let removed = lanes.remove(column);
                let own = stored.own_column();
                if own > column {
                    stored.set_own_column(own - 1);
                }
                let next = removed.from.first().copied();
                if let Some(next) = next {
                    if i + 2 < depth {
                        // the next older row loses its column as well
                        shift_from_for_removal(lanes.iter_mut(), next);
                    }
                }
                stored.set_lanes(lanes);
                match next {
                    Some(next) => column = next,
                    None => break,
                }
            } else {
                let boundary = lanes[column].clone().into_boundary(LaneKind::END, to);
                lanes[column] = boundary;
                stored.set_lanes(lanes);
            }
        }
    }

    /// Reinstate any collapsed lane awaiting the arriving commit or one of
    /// its parents.
    fn expand_lanes(&mut self, id: &CommitId, parents: &[CommitId]) -> Result<(), LanesError> {
        self.expand_lane_for(id)?;
        for parent in parents {
            self.expand_lane_for(parent)?;
        }
        Ok(())
    }

    fn expand_lane_for(&mut self, id: &CommitId) -> Result<(), LanesError> {
        let Some(saved) = self.collapsed.take(id) else {
            return Ok(());
        };
        if self.find_lane(id)?.is_some() {
            // a live lane re-expects the id; the stale snapshot loses
            return Ok(());
        }
        self.expand_lane(saved)
    }

    /// Splice a saved lane back into the active set and into the retained
    /// rows, up to the collapse depth. The oldest touched row gets a
    /// `START` boundary carrying the lane's originating commit id.
    fn expand_lane(&mut self, saved: CollapsedLane) -> Result<(), LanesError> {
        self.ensure_width(self.lanes.len() + 1)?;

        let depth = self.config.collapse_depth.min(self.previous.len());

        // insertion column per retained row, newest first, clamped to the
        // width each row has now
        let mut columns = Vec::with_capacity(depth);
        for row in self.previous.iter().take(depth) {
            let width = row.borrow().lanes().len();
            columns.push(saved.index.min(width));
        }

        let index = saved.index.min(self.lanes.len());
        let mut container =
            LaneContainer::new(Some(saved.to), saved.from, saved.color.clone());
        container.inactive = -i64::from(self.config.recollapse_gap);
        if let Some(&newest) = columns.first() {
            shift_from_for_insertion(self.lanes.iter_mut().map(|c| &mut c.lane), newest);
            container.lane.from.push(newest);
        }
        self.lanes.insert(index, container);

        for (i, row) in self.previous.iter().take(depth).enumerate() {
            let mut stored = row.borrow_mut();
            let mut lanes = stored.lanes();
            let column = columns[i];
            let lane = if i + 1 < depth {
                let next = columns[i + 1];
                shift_from_for_insertion(lanes.iter_mut(), next);
                Lane::with_from(saved.color.clone(), vec![next])
            } else {
                Lane::new(saved.color.clone()).into_boundary(LaneKind::START, saved.from)
            };
            lanes.insert(column, lane);
            let own = stored.own_column();
            if own >= column {
                stored.set_own_column(own + 1);
            }
            stored.set_lanes(lanes);
        }
        Ok(())
    }

    /// Lay out the active set for the row after the arriving commit: age
    /// every lane into a passthrough, then find each parent a lane.
    fn prepare_lanes(
        &mut self,
        id: CommitId,
        parents: &[CommitId],
        own: usize,
    ) -> Result<(), LanesError> {
        for (column, container) in self.lanes.iter_mut().enumerate() {
            container.step(column);
        }

        for parent in parents {
            if let Some(position) = self.find_lane(parent)? {
                // another branch converges on this parent: merge into it
                let container = &mut self.lanes[position];
                container.lane.from.push(own);
                self.colors.advance(&container.lane.color);
                container.reset_inactivity();
                container.from = id;
            } else if self.lanes[own].to.is_none() {
                // the commit's own lane continues into this parent
                let container = &mut self.lanes[own];
                container.to = Some(*parent);
                container.from = id;
                container.lane.color = if parents.len() > 1 {
                    self.colors.next()
                } else {
                    container.lane.color.copy()
                };
            } else {
                let mut container =
                    LaneContainer::new(Some(*parent), id, self.colors.next());
                container.lane.from.push(own);
                self.ensure_width(self.lanes.len() + 1)?;
                self.lanes.push(container);
            }
        }

        // a leaf nothing continues: the lane terminates here
        if self.lanes[own].to.is_none() {
            self.lanes.remove(own);
        }
        Ok(())
    }
}

impl<R: GraphRow> Default for Lanes<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shift `from` indices for the removal of a previous-row column.
fn shift_from_for_removal<'a>(lanes: impl Iterator<Item = &'a mut Lane>, removed: usize) {
    for lane in lanes {
        for index in &mut lane.from {
            if *index > removed {
                *index -= 1;
            }
        }
    }
}

/// Shift `from` indices for the insertion of a previous-row column.
fn shift_from_for_insertion<'a>(lanes: impl Iterator<Item = &'a mut Lane>, inserted: usize) {
    for lane in lanes {
        for index in &mut lane.from {
            if *index >= inserted {
                *index += 1;
            }
        }
    }
}
