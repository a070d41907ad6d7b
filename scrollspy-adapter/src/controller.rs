use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use scrollspy::{Section, SectionHeightRegistry, SelectedSection};

use crate::{
    ContentScroller, ScrollOutcome, SectionScroller, SyncOptions, TabFollower, TabStrip,
};

/// What caused a selection change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionSource {
    /// A new section sequence was loaded.
    Reset,
    /// The user scrolled the content list into another section.
    Scroll,
    /// The user tapped a tab.
    Tap,
}

/// Who currently drives the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncPhase {
    #[default]
    Idle,
    /// User scrolling; scroll offsets are resolved to sections.
    ScrollDriven,
    /// A tap issued a programmatic scroll; scroll offsets are not resolved until it settles.
    TapDriven,
}

/// A callback fired whenever the selected section changes.
pub type OnSelectionChange = Arc<dyn Fn(&SelectedSection, SelectionSource) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ProgrammaticScroll {
    index: usize,
    /// Offset the content list is expected to land on, when it is known.
    target: Option<u64>,
    settle_at_ms: Option<u64>,
}

/// Keeps a sectioned content list and a tab strip in sync.
///
/// This type holds no UI objects besides two capability handles: `C` scrolls the content list,
/// `T` scrolls the tab strip. Either may be missing (not mounted yet). Adapters drive it by
/// calling:
/// - `set_sections` when new content is loaded
/// - `record_height` from each section's layout callback
/// - `handle_scroll` / `handle_scroll_end` / `handle_drag_start` from the content list
/// - `handle_category_click` from the tab strip
/// - `tick(now_ms)` from a frame loop or timer (retries and settling)
///
/// Scrolls issued by the controller itself are tracked explicitly: while one is in flight,
/// scroll events are recorded but never resolved, so the tapped section stays selected.
pub struct SyncController<C, T> {
    options: SyncOptions,
    sections: Vec<Section>,
    registry: SectionHeightRegistry,
    selected: Option<SelectedSection>,
    phase: SyncPhase,
    programmatic: Option<ProgrammaticScroll>,
    last_offset: Option<u64>,
    follower: TabFollower,
    scroller: SectionScroller,
    content: Option<C>,
    tabs: Option<T>,
    on_selection_change: Option<OnSelectionChange>,
}

impl<C, T> fmt::Debug for SyncController<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncController")
            .field("options", &self.options)
            .field("sections", &self.sections)
            .field("registry", &self.registry)
            .field("selected", &self.selected)
            .field("phase", &self.phase)
            .field("programmatic", &self.programmatic)
            .field("last_offset", &self.last_offset)
            .field("scroller", &self.scroller)
            .field("content_attached", &self.content.is_some())
            .field("tabs_attached", &self.tabs.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: ContentScroller, T: TabStrip> SyncController<C, T> {
    pub fn new(options: SyncOptions) -> Self {
        Self {
            follower: TabFollower::new(options.tab_width, options.tab_align),
            scroller: SectionScroller::new(options.max_attempts, options.retry_delay_ms),
            options,
            sections: Vec::new(),
            registry: SectionHeightRegistry::default(),
            selected: None,
            phase: SyncPhase::Idle,
            programmatic: None,
            last_offset: None,
            content: None,
            tabs: None,
            on_selection_change: None,
        }
    }

    pub fn with_handles(options: SyncOptions, content: C, tabs: T) -> Self {
        let mut c = Self::new(options);
        c.content = Some(content);
        c.tabs = Some(tabs);
        c
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Replaces the options. Follows the current selection again when the tab geometry changed.
    pub fn set_options(&mut self, options: SyncOptions) {
        let tab_changed =
            options.tab_width != self.options.tab_width || options.tab_align != self.options.tab_align;
        self.options = options;
        self.follower = TabFollower::new(options.tab_width, options.tab_align);
        self.scroller
            .set_retry_policy(options.max_attempts, options.retry_delay_ms);
        if tab_changed {
            self.follow_selected();
        }
    }

    pub fn set_on_selection_change(
        &mut self,
        on_change: Option<impl Fn(&SelectedSection, SelectionSource) + Send + Sync + 'static>,
    ) {
        self.on_selection_change = on_change.map(|f| Arc::new(f) as _);
    }

    pub fn attach_content(&mut self, content: C) {
        self.content = Some(content);
    }

    pub fn detach_content(&mut self) -> Option<C> {
        self.content.take()
    }

    /// Attaches the tab strip handle and brings the selected tab into view.
    pub fn attach_tabs(&mut self, tabs: T) {
        self.tabs = Some(tabs);
        self.follow_selected();
    }

    pub fn detach_tabs(&mut self) -> Option<T> {
        self.tabs.take()
    }

    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut()
    }

    pub fn tabs(&self) -> Option<&T> {
        self.tabs.as_ref()
    }

    pub fn tabs_mut(&mut self) -> Option<&mut T> {
        self.tabs.as_mut()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn registry(&self) -> &SectionHeightRegistry {
        &self.registry
    }

    /// Version of the current section sequence; changes on every `set_sections`.
    pub fn version(&self) -> u64 {
        self.registry.version()
    }

    /// The highlighted section. `None` only while there are no sections.
    pub fn selected(&self) -> Option<&SelectedSection> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Whether scroll resolution is paused for a programmatic scroll.
    pub fn is_suppressed(&self) -> bool {
        self.programmatic.is_some()
    }

    /// Section the in-flight programmatic scroll is heading to, if any.
    pub fn programmatic_target(&self) -> Option<usize> {
        self.programmatic.map(|p| p.index)
    }

    /// Section a pending scroll retry targets, if any.
    pub fn pending_scroll(&self) -> Option<usize> {
        self.scroller.pending_index()
    }

    /// Last content offset reported through `handle_scroll`.
    pub fn last_offset(&self) -> Option<u64> {
        self.last_offset
    }

    /// Loads a new section sequence, replacing the previous one wholesale.
    ///
    /// All heights are forgotten, pending retries for the old sequence are abandoned and the
    /// first section becomes selected.
    pub fn set_sections<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Section::new(index, name))
            .collect();

        #[cfg(feature = "tracing")]
        for (i, s) in self.sections.iter().enumerate() {
            if self.sections[..i].iter().any(|prev| prev.name == s.name) {
                swarn!(index = i, name = %s.name, "duplicate section name");
            }
        }

        self.registry.reset(self.sections.len());
        self.scroller.cancel();
        self.programmatic = None;
        self.last_offset = None;
        self.phase = SyncPhase::Idle;
        self.selected = None;
        sdebug!(
            count = self.sections.len(),
            version = self.registry.version(),
            "set_sections"
        );
        self.select(0, SelectionSource::Reset);
    }

    /// Records a layout measurement for section `index` of the current sequence.
    ///
    /// Returns `false` when the index is out of range.
    pub fn record_height(&mut self, index: usize, height: u32) -> bool {
        self.registry.record_height(index, height)
    }

    /// Like [`Self::record_height`], but ignores measurements taken for another sequence
    /// version.
    pub fn record_height_in(&mut self, version: u64, index: usize, height: u32) -> bool {
        if version != self.registry.version() {
            strace!(
                version,
                current = self.registry.version(),
                index,
                "record_height_in: stale measurement"
            );
            return false;
        }
        self.registry.record_height(index, height)
    }

    /// Handles a scroll event of the content list.
    pub fn handle_scroll(&mut self, offset: u64) {
        self.last_offset = Some(offset);

        if let Some(p) = self.programmatic {
            if !self.scroller.is_pending() && p.target == Some(offset) {
                sdebug!(index = p.index, offset, "programmatic scroll reached its target");
                self.settle();
            }
            return;
        }

        let Some(index) = self.registry.index_at_offset(offset) else {
            return;
        };
        self.phase = SyncPhase::ScrollDriven;
        if self.selected.as_ref().is_some_and(|s| s.index == index) {
            return;
        }
        strace!(offset, index, "handle_scroll: section changed");
        self.select(index, SelectionSource::Scroll);
        self.follower.follow(self.tabs.as_mut(), index);
    }

    /// Handles a tap on the tab for section `(name, index)`.
    ///
    /// The selection changes immediately; the content list follows as soon as the section can be
    /// scrolled to. A pair that does not match the current sequence (a tap on a tab rendered for
    /// older content) is ignored and `false` is returned.
    pub fn handle_category_click(&mut self, name: &str, index: usize, now_ms: u64) -> bool {
        match self.sections.get(index) {
            Some(section) if section.name == name => {}
            _ => {
                swarn!(name, index, "ignoring tap on a stale tab");
                return false;
            }
        }

        sdebug!(name, index, "handle_category_click");
        self.select(index, SelectionSource::Tap);
        self.phase = SyncPhase::TapDriven;
        self.programmatic = Some(ProgrammaticScroll {
            index,
            target: None,
            settle_at_ms: None,
        });

        let outcome = self
            .scroller
            .scroll_to(self.content.as_mut(), &self.registry, index, now_ms);
        self.apply_outcome(outcome, now_ms);
        true
    }

    /// Like [`Self::handle_category_click`], looking the section up by name.
    pub fn handle_category_click_by_name(&mut self, name: &str, now_ms: u64) -> bool {
        let Some(index) = self.sections.iter().position(|s| s.name == name) else {
            swarn!(name, "ignoring tap on an unknown section");
            return false;
        };
        self.handle_category_click(name, index, now_ms)
    }

    /// The content list reports that scrolling came to rest.
    pub fn handle_scroll_end(&mut self) {
        if self.programmatic.is_some() {
            if !self.scroller.is_pending() {
                self.settle();
            }
            return;
        }
        self.phase = SyncPhase::Idle;
    }

    /// The user started dragging the content list. Any programmatic scroll is abandoned.
    pub fn handle_drag_start(&mut self) {
        if self.programmatic.take().is_some() {
            sdebug!("handle_drag_start: abandoning programmatic scroll");
        }
        self.scroller.cancel();
        self.phase = SyncPhase::ScrollDriven;
    }

    /// Advances retries and the settle timeout. Call from a frame loop or timer.
    ///
    /// Returns the outcome of a retry that ran at `now_ms`, if any.
    pub fn tick(&mut self, now_ms: u64) -> Option<ScrollOutcome> {
        if let Some(outcome) = self
            .scroller
            .tick(self.content.as_mut(), &self.registry, now_ms)
        {
            self.apply_outcome(outcome, now_ms);
            return Some(outcome);
        }

        let settle_at = self.programmatic.and_then(|p| p.settle_at_ms);
        if settle_at.is_some_and(|at| now_ms >= at) {
            sdebug!(now_ms, "programmatic scroll settled by timeout");
            self.settle();
        }
        None
    }

    /// Scrolls the tab strip to the selected tab.
    pub fn follow_selected(&mut self) -> Option<u64> {
        let index = self.selected.as_ref()?.index;
        self.follower.follow(self.tabs.as_mut(), index)
    }

    fn apply_outcome(&mut self, outcome: ScrollOutcome, now_ms: u64) {
        match outcome {
            ScrollOutcome::Native { index } => {
                let target = self.known_start(index);
                self.begin_settle(target, now_ms);
            }
            ScrollOutcome::Offset { offset, .. } => self.begin_settle(Some(offset), now_ms),
            ScrollOutcome::Deferred { .. } => {}
            ScrollOutcome::GaveUp { .. } | ScrollOutcome::Stale { .. } => self.settle(),
        }
    }

    /// Start offset of `index`, if every section above it has been measured.
    fn known_start(&self, index: usize) -> Option<u64> {
        if index > 0 && !self.registry.is_measured_through(index - 1) {
            return None;
        }
        self.registry.section_start(index)
    }

    fn begin_settle(&mut self, target: Option<u64>, now_ms: u64) {
        if let Some(p) = self.programmatic.as_mut() {
            p.target = target;
            p.settle_at_ms = Some(now_ms.saturating_add(self.options.settle_timeout_ms));
        }
    }

    fn settle(&mut self) {
        self.programmatic = None;
        self.phase = SyncPhase::Idle;
    }

    fn select(&mut self, index: usize, source: SelectionSource) {
        let Some(section) = self.sections.get(index) else {
            return;
        };
        if self.selected.as_ref().is_some_and(|s| s.is(section)) {
            return;
        }
        self.selected = Some(SelectedSection::from(section));
        if let (Some(cb), Some(selected)) = (&self.on_selection_change, &self.selected) {
            cb(selected, source);
        }
    }
}
