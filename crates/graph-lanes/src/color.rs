use std::cell::Cell;
use std::rc::Rc;

/// Number of distinct hues in the repeating palette.
pub const PALETTE_SIZE: u8 = 8;

/// A shared color identity for one visually continuous lane segment.
///
/// Cloning a `LaneColor` shares the underlying palette slot: every holder
/// sees a later re-hue (see [`ColorCycle::advance`]). [`LaneColor::copy`]
/// instead forks an independent slot holding the same hue, so the new
/// handle is unaffected by later advances of the original.
#[derive(Clone, Debug)]
pub struct LaneColor(Rc<Cell<u8>>);

impl LaneColor {
    fn at(index: u8) -> Self {
        Self(Rc::new(Cell::new(index % PALETTE_SIZE)))
    }

    /// The palette slot currently held.
    pub fn index(&self) -> u8 {
        self.0.get()
    }

    /// Fork an independent color holding the same hue.
    pub fn copy(&self) -> Self {
        Self::at(self.0.get())
    }

    /// Check whether two handles share the same underlying slot.
    pub fn shares_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn set(&self, index: u8) {
        self.0.set(index % PALETTE_SIZE);
    }
}

impl PartialEq for LaneColor {
    fn eq(&self, other: &Self) -> bool {
        self.index() == other.index()
    }
}

impl Eq for LaneColor {}

/// The repeating palette rotation owned by one lane allocator.
///
/// Replaces an ambient global rotation: the position lives here and is
/// restarted explicitly with [`ColorCycle::reset`] when the traversal
/// restarts.
#[derive(Debug, Default)]
pub struct ColorCycle {
    position: u8,
}

impl ColorCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a fresh color at the next palette slot.
    pub fn next(&mut self) -> LaneColor {
        let color = LaneColor::at(self.position);
        self.step();
        color
    }

    /// Re-hue `color` in place to the next palette slot.
    ///
    /// Used when two lanes merge into one visual color: every lane snapshot
    /// sharing the slot picks up the new hue.
    pub fn advance(&mut self, color: &LaneColor) {
        color.set(self.position);
        self.step();
    }

    /// Restart the rotation at the first palette slot.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    fn step(&mut self) {
        self.position = (self.position + 1) % PALETTE_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_palette() {
        let mut cycle = ColorCycle::new();
        for expected in 0..PALETTE_SIZE {
            assert_eq!(cycle.next().index(), expected);
        }
        // wraps back around
        assert_eq!(cycle.next().index(), 0);
    }

    #[test]
    fn clone_shares_copy_forks() {
        let mut cycle = ColorCycle::new();
        let color = cycle.next();
        let shared = color.clone();
        let forked = color.copy();

        assert!(color.shares_with(&shared));
        assert!(!color.shares_with(&forked));
        assert_eq!(forked.index(), color.index());

        cycle.advance(&color);
        assert_eq!(shared.index(), color.index());
        assert_ne!(forked.index(), color.index());
    }

    #[test]
    fn advance_consumes_a_rotation_slot() {
        let mut cycle = ColorCycle::new();
        let a = cycle.next(); // slot 0
        cycle.advance(&a); // re-hued to slot 1
        assert_eq!(a.index(), 1);
        assert_eq!(cycle.next().index(), 2);
    }

    #[test]
    fn reset_restarts_rotation() {
        let mut cycle = ColorCycle::new();
        cycle.next();
        cycle.next();
        cycle.reset();
        assert_eq!(cycle.next().index(), 0);
    }

    #[test]
    fn equality_is_by_hue() {
        let mut cycle = ColorCycle::new();
        let a = cycle.next();
        let b = a.copy();
        assert_eq!(a, b);
        cycle.advance(&a);
        assert_ne!(a, b);
    }
}
