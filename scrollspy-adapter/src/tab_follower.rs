use crate::{TabAlign, TabStrip};

/// Keeps the highlighted tab visible by scrolling the tab strip.
///
/// Every tab is assumed to be `tab_width` wide; there is no tab measurement. Following is a
/// best-effort convenience: without a tab strip handle it does nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabFollower {
    tab_width: u32,
    align: TabAlign,
}

impl TabFollower {
    pub fn new(tab_width: u32, align: TabAlign) -> Self {
        Self { tab_width, align }
    }

    pub fn tab_width(&self) -> u32 {
        self.tab_width
    }

    pub fn align(&self) -> TabAlign {
        self.align
    }

    /// Horizontal strip offset that brings tab `index` into view.
    pub fn offset_for(&self, index: usize, viewport_width: Option<u32>) -> u64 {
        let width = self.tab_width as u64;
        let start = (index as u64).saturating_mul(width);
        match (self.align, viewport_width) {
            (TabAlign::Center, Some(view)) => start
                .saturating_add(width / 2)
                .saturating_sub(view as u64 / 2),
            _ => start,
        }
    }

    /// Scrolls `tabs` to tab `index`. Returns the offset applied, or `None` without a handle.
    pub fn follow<T: TabStrip + ?Sized>(&self, tabs: Option<&mut T>, index: usize) -> Option<u64> {
        let tabs = tabs?;
        let offset = self.offset_for(index, tabs.viewport_width());
        strace!(index, offset, "TabFollower::follow");
        tabs.scroll_to_offset(offset);
        Some(offset)
    }
}
