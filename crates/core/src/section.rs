//! Pure section resolution over a normalized boundary list.
//!
//! All functions here assume boundaries as produced by
//! [`crate::model::normalize_boundaries`]: non-empty, starting at 0, strictly
//! increasing, every value below the item count. They are cheap enough to call
//! on every render; nothing is cached.

/// A contiguous run of content items between two boundaries.
///
/// A derived view, never stored: `start` is the owning boundary and `end` is
/// the next boundary (or the item count), both 0-indexed, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl Section {
    /// Whether a 0-indexed item offset falls inside this section.
    #[must_use]
    pub fn contains(&self, index0: usize) -> bool {
        self.start <= index0 && index0 < self.end
    }
}

/// Resolves the section owning a 0-indexed item offset.
///
/// The greatest boundary `<= index0` wins, so an offset equal to a boundary
/// belongs to the section that boundary starts. Out-of-range offsets clamp to
/// the nearest valid section instead of failing.
#[must_use]
pub fn section_of(index0: usize, boundaries: &[usize], item_count: usize) -> Section {
    debug_assert!(!boundaries.is_empty() && boundaries[0] == 0);
    debug_assert!(item_count > 0);

    let clamped = index0.min(item_count.saturating_sub(1));
    let index = boundaries
        .iter()
        .rposition(|&b| b <= clamped)
        .unwrap_or(0);

    Section {
        index,
        start: boundaries[index],
        end: boundaries.get(index + 1).copied().unwrap_or(item_count),
    }
}

/// Materializes every section by pairing consecutive boundaries, with the
/// item count as the sentinel end of the last one.
#[must_use]
pub fn all_sections(boundaries: &[usize], item_count: usize) -> Vec<Section> {
    boundaries
        .iter()
        .enumerate()
        .map(|(index, &start)| Section {
            index,
            start,
            end: boundaries.get(index + 1).copied().unwrap_or(item_count),
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
