/// Maps a scroll offset to the index of the section occupying it.
///
/// `cumulative_heights[i]` is the start offset of section `i` (see
/// [`crate::SectionHeightRegistry::cumulative_heights`]). Section `i` covers the half-open
/// interval `[start_i, start_{i+1})`; the last section is open-ended, so offsets past the end of
/// the content resolve to it.
///
/// An offset exactly on a section start belongs to that section, never to the one above it. A
/// zero-height (not yet measured) section claims the offset it starts at; when several sections
/// start at the same offset the first one wins, so `0` always resolves to the first section.
///
/// Resolution is monotonic: a larger offset never yields a smaller index.
///
/// Returns `None` for an empty sequence.
pub fn resolve_offset(offset: u64, cumulative_heights: &[u64]) -> Option<usize> {
    let last = cumulative_heights.len().checked_sub(1)?;
    for (index, &start) in cumulative_heights.iter().enumerate() {
        let end = cumulative_heights
            .get(index + 1)
            .copied()
            .unwrap_or(u64::MAX);
        if start == offset || (start <= offset && offset < end) {
            return Some(index);
        }
    }
    Some(last)
}
