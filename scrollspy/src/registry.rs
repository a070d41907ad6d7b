use alloc::vec::Vec;

use crate::fenwick::Fenwick;

/// Measured heights for the sections of the current sequence.
///
/// Each section starts out unmeasured. Unknown heights count as `0` in every prefix sum, but a
/// section only counts as measured once the layout layer has reported its height.
///
/// The registry carries a `version` that changes on every [`Self::reset`], so callers holding
/// an index from an older sequence can detect that it no longer refers to the same section.
#[derive(Clone, Debug)]
pub struct SectionHeightRegistry {
    heights: Vec<Option<u32>>,
    sums: Fenwick,
    version: u64,
}

impl Default for SectionHeightRegistry {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SectionHeightRegistry {
    pub fn new(len: usize) -> Self {
        Self {
            heights: alloc::vec![None; len],
            sums: Fenwick::new(len),
            version: 0,
        }
    }

    /// Forgets every recorded height and resizes the registry to `len` sections.
    ///
    /// Indices recorded before a reset are never carried over: after new content is loaded an
    /// index may point at a different section.
    pub fn reset(&mut self, len: usize) {
        self.heights.clear();
        self.heights.resize(len, None);
        self.sums = Fenwick::new(len);
        self.version = self.version.wrapping_add(1);
        sdebug!(len, version = self.version, "SectionHeightRegistry::reset");
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Records the measured height of section `index`. The newest measurement wins.
    ///
    /// Out-of-range indices are ignored (a late layout callback for a sequence that has since
    /// been replaced). Returns `true` when the measurement was applied.
    pub fn record_height(&mut self, index: usize, height: u32) -> bool {
        let Some(slot) = self.heights.get_mut(index) else {
            strace!(index, height, len = self.heights.len(), "record_height: out of range");
            return false;
        };
        let prev = slot.replace(height).unwrap_or(0);
        self.sums.add(index, height as i64 - prev as i64);
        strace!(index, height, "record_height");
        true
    }

    pub fn height(&self, index: usize) -> Option<u32> {
        self.heights.get(index).copied().flatten()
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.height(index).is_some()
    }

    /// Whether section `index` and every section before it have been measured.
    ///
    /// Only then is [`Self::section_start`] the real on-screen position of the section.
    pub fn is_measured_through(&self, index: usize) -> bool {
        index < self.heights.len() && self.heights[..=index].iter().all(Option::is_some)
    }

    pub fn measured_count(&self) -> usize {
        self.heights.iter().filter(|h| h.is_some()).count()
    }

    /// Prefix sums of the section heights in index order.
    ///
    /// Entry `i` is the start offset of section `i`; unknown heights count as `0`.
    pub fn cumulative_heights(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.heights.len());
        let mut acc = 0u64;
        for h in &self.heights {
            out.push(acc);
            acc = acc.saturating_add(h.unwrap_or(0) as u64);
        }
        out
    }

    pub fn section_start(&self, index: usize) -> Option<u64> {
        (index < self.heights.len()).then(|| self.sums.prefix_sum(index))
    }

    pub fn section_end(&self, index: usize) -> Option<u64> {
        let start = self.section_start(index)?;
        Some(start.saturating_add(self.height(index).unwrap_or(0) as u64))
    }

    pub fn total_height(&self) -> u64 {
        self.sums.total()
    }

    /// Maps a scroll offset to the section occupying it.
    ///
    /// Same rule as [`crate::resolve_offset`], evaluated over the Fenwick tree in `O(log n)`.
    /// Returns `None` when there are no sections.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let last = self.heights.len().checked_sub(1)?;

        // First section starting at or after `offset`: it claims `offset` when it starts
        // exactly there, even with zero height.
        let first_at = match offset {
            0 => 0,
            _ => self.sums.lower_bound(offset - 1) + 1,
        };
        if first_at <= last && self.sums.prefix_sum(first_at) == offset {
            return Some(first_at);
        }

        Some(self.sums.lower_bound(offset).min(last))
    }
}
