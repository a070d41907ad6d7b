use scrollspy::SectionHeightRegistry;

use crate::ContentScroller;

/// Result of one attempt to bring a section to the top of the content list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollOutcome {
    /// The content list accepted the native scroll-to-index request.
    Native { index: usize },
    /// The native request failed; scrolled to the section's computed start offset instead.
    Offset { index: usize, offset: u64 },
    /// Neither worked yet; retry number `retry` is scheduled for `due_ms`.
    Deferred { index: usize, retry: u32, due_ms: u64 },
    /// The attempt budget is spent. The physical scroll is abandoned.
    GaveUp { index: usize, attempts: u32 },
    /// The index no longer refers to the current section sequence.
    Stale { index: usize },
}

impl ScrollOutcome {
    pub fn index(&self) -> usize {
        match *self {
            Self::Native { index }
            | Self::Offset { index, .. }
            | Self::Deferred { index, .. }
            | Self::GaveUp { index, .. }
            | Self::Stale { index } => index,
        }
    }

    /// Whether the content list was physically scrolled.
    pub fn is_scrolled(&self) -> bool {
        matches!(self, Self::Native { .. } | Self::Offset { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingScroll {
    index: usize,
    version: u64,
    retry: u32,
    due_ms: u64,
}

/// Scrolls the content list to a section, retrying while the section is not measured yet.
///
/// Retries are timer records driven by [`Self::tick`]; nothing blocks. At most one retry chain is
/// pending at a time: a new [`Self::scroll_to`] replaces it.
#[derive(Clone, Debug)]
pub struct SectionScroller {
    max_attempts: u32,
    retry_delay_ms: u64,
    pending: Option<PendingScroll>,
}

impl SectionScroller {
    /// `max_attempts` counts the first attempt; at least one attempt is always made.
    pub fn new(max_attempts: u32, retry_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            retry_delay_ms,
            pending: None,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn retry_delay_ms(&self) -> u64 {
        self.retry_delay_ms
    }

    /// Updates the retry policy. A pending retry keeps its due time.
    pub fn set_retry_policy(&mut self, max_attempts: u32, retry_delay_ms: u64) {
        self.max_attempts = max_attempts;
        self.retry_delay_ms = retry_delay_ms;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Section index of the pending retry, if any.
    pub fn pending_index(&self) -> Option<usize> {
        self.pending.map(|p| p.index)
    }

    /// When the pending retry is due, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.map(|p| p.due_ms)
    }

    pub fn cancel(&mut self) {
        if let Some(_p) = self.pending.take() {
            sdebug!(index = _p.index, retry = _p.retry, "SectionScroller::cancel");
        }
    }

    /// Brings section `index` to the top of the content list.
    ///
    /// 1. Ask the list to scroll to the index natively.
    /// 2. If that fails and the section (and everything above it) has been measured, scroll to
    ///    the section's start offset instead.
    /// 3. Otherwise schedule a retry `retry_delay_ms` from `now_ms`.
    pub fn scroll_to<C: ContentScroller + ?Sized>(
        &mut self,
        content: Option<&mut C>,
        registry: &SectionHeightRegistry,
        index: usize,
        now_ms: u64,
    ) -> ScrollOutcome {
        self.pending = None;
        self.attempt(content, registry, index, 0, now_ms)
    }

    /// Runs the pending retry if it is due at `now_ms`.
    ///
    /// Returns `None` when nothing ran.
    pub fn tick<C: ContentScroller + ?Sized>(
        &mut self,
        content: Option<&mut C>,
        registry: &SectionHeightRegistry,
        now_ms: u64,
    ) -> Option<ScrollOutcome> {
        let pending = self.pending?;
        if now_ms < pending.due_ms {
            return None;
        }
        self.pending = None;

        if pending.version != registry.version() {
            sdebug!(
                index = pending.index,
                version = pending.version,
                current = registry.version(),
                "SectionScroller: dropping retry for a replaced section sequence"
            );
            return Some(ScrollOutcome::Stale {
                index: pending.index,
            });
        }

        Some(self.attempt(content, registry, pending.index, pending.retry, now_ms))
    }

    fn attempt<C: ContentScroller + ?Sized>(
        &mut self,
        content: Option<&mut C>,
        registry: &SectionHeightRegistry,
        index: usize,
        retry: u32,
        now_ms: u64,
    ) -> ScrollOutcome {
        if index >= registry.len() {
            return ScrollOutcome::Stale { index };
        }

        if let Some(content) = content {
            match content.scroll_to_index(index) {
                Ok(()) => {
                    strace!(index, retry, "scroll_to_index");
                    return ScrollOutcome::Native { index };
                }
                Err(_err) => {
                    strace!(index, retry, error = %_err, "scroll_to_index failed");
                }
            }

            if registry.is_measured_through(index) {
                if let Some(offset) = registry.section_start(index) {
                    strace!(index, offset, "falling back to scroll_to_offset");
                    content.scroll_to_offset(offset);
                    return ScrollOutcome::Offset { index, offset };
                }
            }
        }

        let attempts = retry + 1;
        if attempts >= self.max_attempts {
            swarn!(index, attempts, "giving up scrolling to section");
            return ScrollOutcome::GaveUp { index, attempts };
        }

        let retry = retry + 1;
        let due_ms = now_ms.saturating_add(self.retry_delay_ms);
        self.pending = Some(PendingScroll {
            index,
            version: registry.version(),
            retry,
            due_ms,
        });
        ScrollOutcome::Deferred {
            index,
            retry,
            due_ms,
        }
    }
}
