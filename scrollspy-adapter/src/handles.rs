use alloc::boxed::Box;

use thiserror::Error;

/// Why a native scroll-to-index request could not be carried out.
///
/// These are transient layout races, not failures: the controller always absorbs them by
/// falling back to an offset-based scroll or by retrying later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ScrollError {
    #[error("section {index} has not been measured yet")]
    NotMeasured { index: usize },
    #[error("section {index} is outside the materialized range")]
    NotMaterialized { index: usize },
    #[error("scroll container is not attached")]
    Detached,
    #[error("scroll request rejected: {reason}")]
    Other { reason: &'static str },
}

/// Capability handle for the vertically scrolling content list.
///
/// Implemented by the UI layer; the controller never holds any other reference to the list.
pub trait ContentScroller {
    /// Scrolls so that the first row of section `index` is at the top of the viewport.
    fn scroll_to_index(&mut self, index: usize) -> Result<(), ScrollError>;

    /// Scrolls to an absolute offset (pixels from the top of the content).
    fn scroll_to_offset(&mut self, offset: u64);
}

/// Capability handle for the horizontal tab strip.
pub trait TabStrip {
    /// Scrolls the strip to an absolute horizontal offset.
    fn scroll_to_offset(&mut self, offset: u64);

    /// Width of the strip's visible area, if the UI layer knows it.
    fn viewport_width(&self) -> Option<u32> {
        None
    }
}

impl<C: ContentScroller + ?Sized> ContentScroller for &mut C {
    fn scroll_to_index(&mut self, index: usize) -> Result<(), ScrollError> {
        (**self).scroll_to_index(index)
    }

    fn scroll_to_offset(&mut self, offset: u64) {
        (**self).scroll_to_offset(offset);
    }
}

impl<C: ContentScroller + ?Sized> ContentScroller for Box<C> {
    fn scroll_to_index(&mut self, index: usize) -> Result<(), ScrollError> {
        (**self).scroll_to_index(index)
    }

    fn scroll_to_offset(&mut self, offset: u64) {
        (**self).scroll_to_offset(offset);
    }
}

impl<T: TabStrip + ?Sized> TabStrip for &mut T {
    fn scroll_to_offset(&mut self, offset: u64) {
        (**self).scroll_to_offset(offset);
    }

    fn viewport_width(&self) -> Option<u32> {
        (**self).viewport_width()
    }
}

impl<T: TabStrip + ?Sized> TabStrip for Box<T> {
    fn scroll_to_offset(&mut self, offset: u64) {
        (**self).scroll_to_offset(offset);
    }

    fn viewport_width(&self) -> Option<u32> {
        (**self).viewport_width()
    }
}
