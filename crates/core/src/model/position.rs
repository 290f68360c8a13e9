use serde::{Deserialize, Serialize};
use std::fmt;

/// The learner's 1-indexed place within a module's item sequence.
///
/// Section boundaries live in 0-indexed item space; this type is the single
/// point where the two conventions are converted, so callers never do the
/// off-by-one arithmetic themselves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ItemPosition(usize);

impl ItemPosition {
    /// Creates a position; returns `None` for 0, which is not a valid 1-indexed place.
    #[must_use]
    pub fn new(position: usize) -> Option<Self> {
        (position >= 1).then_some(Self(position))
    }

    /// The first item of a module.
    #[must_use]
    pub fn first() -> Self {
        Self(1)
    }

    /// Position of the item starting at a 0-indexed section boundary.
    #[must_use]
    pub fn from_boundary(boundary: usize) -> Self {
        Self(boundary + 1)
    }

    /// The 1-indexed value shown to the learner.
    #[must_use]
    pub fn get(&self) -> usize {
        self.0
    }

    /// The 0-indexed offset used against boundaries and item slices.
    #[must_use]
    pub fn index0(&self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for ItemPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_position() {
        assert_eq!(ItemPosition::new(0), None);
        assert_eq!(ItemPosition::new(1), Some(ItemPosition::first()));
    }

    #[test]
    fn boundary_conversion_is_one_based() {
        let pos = ItemPosition::from_boundary(2);
        assert_eq!(pos.get(), 3);
        assert_eq!(pos.index0(), 2);
    }
}
