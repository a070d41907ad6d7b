use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use std::string::ToString;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MockContent {
    native_ok: bool,
    index_calls: Vec<usize>,
    offset_calls: Vec<u64>,
}

impl MockContent {
    fn new(native_ok: bool) -> Self {
        Self {
            native_ok,
            ..Self::default()
        }
    }
}

impl ContentScroller for MockContent {
    fn scroll_to_index(&mut self, index: usize) -> Result<(), ScrollError> {
        self.index_calls.push(index);
        if self.native_ok {
            Ok(())
        } else {
            Err(ScrollError::NotMeasured { index })
        }
    }

    fn scroll_to_offset(&mut self, offset: u64) {
        self.offset_calls.push(offset);
    }
}

#[derive(Debug, Default)]
struct MockTabs {
    width: Option<u32>,
    offsets: Vec<u64>,
}

impl TabStrip for MockTabs {
    fn scroll_to_offset(&mut self, offset: u64) {
        self.offsets.push(offset);
    }

    fn viewport_width(&self) -> Option<u32> {
        self.width
    }
}

type Controller = SyncController<MockContent, MockTabs>;

fn controller(native_ok: bool) -> Controller {
    let mut c = SyncController::with_handles(
        SyncOptions::default(),
        MockContent::new(native_ok),
        MockTabs::default(),
    );
    c.set_sections(["A", "B", "C"]);
    c
}

fn measure_all(c: &mut Controller) {
    c.record_height(0, 100);
    c.record_height(1, 200);
    c.record_height(2, 150);
}

fn selected_index(c: &Controller) -> Option<usize> {
    c.selected().map(|s| s.index)
}

fn content(c: &Controller) -> &MockContent {
    c.content().unwrap()
}

fn tab_offsets(c: &Controller) -> &[u64] {
    &c.tabs().unwrap().offsets
}

#[test]
fn scrolling_into_a_section_selects_it_and_follows_the_tab() {
    let mut c = controller(true);
    measure_all(&mut c);
    assert_eq!(selected_index(&c), Some(0));

    c.handle_scroll(50);
    assert_eq!(c.phase(), SyncPhase::ScrollDriven);
    assert_eq!(selected_index(&c), Some(0));
    assert!(tab_offsets(&c).is_empty());

    c.handle_scroll(100);
    assert_eq!(c.selected().unwrap().name, "B");
    assert_eq!(tab_offsets(&c), [100]);

    // Same section: no extra tab scroll.
    c.handle_scroll(250);
    assert_eq!(tab_offsets(&c), [100]);

    c.handle_scroll(300);
    assert_eq!(selected_index(&c), Some(2));
    assert_eq!(tab_offsets(&c), [100, 200]);

    c.handle_scroll(999);
    assert_eq!(selected_index(&c), Some(2));
    assert_eq!(c.last_offset(), Some(999));

    c.handle_scroll_end();
    assert_eq!(c.phase(), SyncPhase::Idle);
}

#[test]
fn replacing_sections_resets_selection_and_heights() {
    let mut c = controller(true);
    measure_all(&mut c);
    c.handle_scroll(300);
    assert_eq!(selected_index(&c), Some(2));
    let version = c.version();

    c.set_sections(["Drinks", "Sides"]);
    assert_ne!(c.version(), version);
    assert_eq!(c.sections().len(), 2);
    assert_eq!(c.registry().len(), 2);
    assert_eq!(c.registry().measured_count(), 0);
    assert_eq!(c.selected().unwrap().name, "Drinks");
    assert_eq!(selected_index(&c), Some(0));
    assert_eq!(c.phase(), SyncPhase::Idle);
    assert_eq!(c.last_offset(), None);
}

#[test]
fn empty_sequence_has_no_selection() {
    let mut c = controller(true);
    c.set_sections(Vec::<&str>::new());
    assert!(c.selected().is_none());

    c.handle_scroll(10);
    assert!(c.selected().is_none());
    assert!(!c.handle_category_click("A", 0, 0));
}

#[test]
fn tap_on_unmeasured_section_gives_up_after_ten_attempts() {
    let mut c = controller(false);
    c.record_height(0, 100);
    c.record_height(1, 200);

    assert!(c.handle_category_click("C", 2, 0));
    assert_eq!(c.selected().unwrap().name, "C");
    assert_eq!(c.phase(), SyncPhase::TapDriven);
    assert!(c.is_suppressed());
    assert_eq!(c.pending_scroll(), Some(2));

    // Not due yet.
    assert_eq!(c.tick(50), None);

    let mut now = 0;
    for retry in 1..=8u32 {
        now += 100;
        assert_eq!(
            c.tick(now),
            Some(ScrollOutcome::Deferred {
                index: 2,
                retry: retry + 1,
                due_ms: now + 100,
            })
        );
        // Scroll events from the list never override the tapped section meanwhile.
        c.handle_scroll(0);
        assert_eq!(c.selected().unwrap().name, "C");
        assert!(c.is_suppressed());
    }

    now += 100;
    assert_eq!(now, 900);
    assert_eq!(
        c.tick(now),
        Some(ScrollOutcome::GaveUp {
            index: 2,
            attempts: 10
        })
    );
    assert_eq!(content(&c).index_calls.len(), 10);
    assert!(content(&c).offset_calls.is_empty());
    assert_eq!(c.pending_scroll(), None);
    assert!(!c.is_suppressed());
    assert_eq!(c.phase(), SyncPhase::Idle);
    assert_eq!(c.selected().unwrap().name, "C");
    assert_eq!(c.tick(now + 100), None);
}

#[test]
fn tap_falls_back_to_offset_scroll_when_native_scroll_fails() {
    let mut c = controller(false);
    measure_all(&mut c);

    assert!(c.handle_category_click("C", 2, 0));
    assert_eq!(content(&c).index_calls, [2]);
    assert_eq!(content(&c).offset_calls, [300]);
    assert!(c.is_suppressed());
    assert_eq!(c.programmatic_target(), Some(2));

    // Intermediate frames of the programmatic scroll are not resolved.
    c.handle_scroll(150);
    assert_eq!(selected_index(&c), Some(2));
    assert!(tab_offsets(&c).is_empty());

    c.handle_scroll(300);
    assert!(!c.is_suppressed());
    assert_eq!(c.phase(), SyncPhase::Idle);
    assert_eq!(selected_index(&c), Some(2));

    c.handle_scroll(100);
    assert_eq!(selected_index(&c), Some(1));
    assert_eq!(tab_offsets(&c), [100]);
}

#[test]
fn native_scroll_settles_on_scroll_end() {
    let mut c = controller(true);
    measure_all(&mut c);

    c.handle_category_click("B", 1, 0);
    assert_eq!(content(&c).index_calls, [1]);
    assert!(content(&c).offset_calls.is_empty());

    c.handle_scroll(40);
    assert_eq!(selected_index(&c), Some(1));

    c.handle_scroll_end();
    assert!(!c.is_suppressed());

    c.handle_scroll(40);
    assert_eq!(selected_index(&c), Some(0));
}

#[test]
fn programmatic_scroll_settles_after_timeout() {
    let mut c = controller(true);
    measure_all(&mut c);

    c.handle_category_click("C", 2, 1_000);
    assert_eq!(c.tick(1_599), None);
    assert!(c.is_suppressed());

    assert_eq!(c.tick(1_600), None);
    assert!(!c.is_suppressed());
    assert_eq!(c.phase(), SyncPhase::Idle);
}

#[test]
fn retry_succeeds_once_the_section_is_measured() {
    let mut c = controller(false);
    c.record_height(0, 100);
    c.record_height(1, 200);

    c.handle_category_click("C", 2, 0);
    assert_eq!(c.pending_scroll(), Some(2));

    c.record_height(2, 150);
    assert_eq!(
        c.tick(100),
        Some(ScrollOutcome::Offset {
            index: 2,
            offset: 300
        })
    );
    assert_eq!(content(&c).offset_calls, [300]);
    assert!(c.is_suppressed());

    c.handle_scroll(300);
    assert!(!c.is_suppressed());
}

#[test]
fn replacing_sections_abandons_pending_retries() {
    let mut c = controller(false);
    c.handle_category_click("C", 2, 0);
    assert_eq!(c.pending_scroll(), Some(2));

    c.set_sections(["X", "Y", "Z"]);
    assert_eq!(c.pending_scroll(), None);
    assert!(!c.is_suppressed());
    assert_eq!(c.tick(100), None);
    assert_eq!(content(&c).index_calls, [2]);
    assert_eq!(c.selected().unwrap().name, "X");
}

#[test]
fn stale_taps_are_ignored() {
    let mut c = controller(true);
    assert!(!c.handle_category_click("Z", 1, 0));
    assert!(!c.handle_category_click("B", 5, 0));
    assert!(!c.handle_category_click("C", 1, 0));
    assert!(!c.handle_category_click_by_name("Nope", 0));
    assert_eq!(selected_index(&c), Some(0));
    assert!(content(&c).index_calls.is_empty());
    assert!(!c.is_suppressed());

    assert!(c.handle_category_click_by_name("B", 0));
    assert_eq!(selected_index(&c), Some(1));
}

#[test]
fn stale_measurements_are_ignored() {
    let mut c = controller(true);
    let old = c.version();
    c.set_sections(["X", "Y"]);

    assert!(!c.record_height_in(old, 0, 100));
    assert!(!c.record_height(5, 100));
    assert_eq!(c.registry().measured_count(), 0);

    assert!(c.record_height_in(c.version(), 0, 100));
    assert_eq!(c.registry().height(0), Some(100));
}

#[test]
fn drag_start_abandons_programmatic_scroll() {
    let mut c = controller(false);
    c.record_height(0, 100);
    c.handle_category_click("C", 2, 0);
    assert!(c.is_suppressed());

    c.handle_drag_start();
    assert!(!c.is_suppressed());
    assert_eq!(c.pending_scroll(), None);
    assert_eq!(c.phase(), SyncPhase::ScrollDriven);

    c.handle_scroll(50);
    assert_eq!(selected_index(&c), Some(0));
}

#[test]
fn missing_content_handle_defers_until_attached() {
    let mut c = Controller::new(SyncOptions::default());
    c.set_sections(["A", "B"]);
    c.record_height(0, 100);
    c.record_height(1, 100);

    assert!(c.handle_category_click("B", 1, 0));
    assert_eq!(c.pending_scroll(), Some(1));

    c.attach_content(MockContent::new(true));
    assert_eq!(c.tick(100), Some(ScrollOutcome::Native { index: 1 }));
    assert_eq!(content(&c).index_calls, [1]);

    c.handle_scroll(100);
    assert!(!c.is_suppressed());
}

#[test]
fn missing_tab_strip_is_a_silent_no_op() {
    let mut c = Controller::new(SyncOptions::default());
    c.set_sections(["A", "B", "C"]);
    c.record_height(0, 10);
    c.record_height(1, 10);
    c.handle_scroll(15);
    assert_eq!(selected_index(&c), Some(1));
    assert_eq!(c.follow_selected(), None);

    c.attach_tabs(MockTabs::default());
    assert_eq!(tab_offsets(&c), [100]);
}

#[test]
fn set_options_refollows_when_tab_geometry_changes() {
    let mut c = controller(true);
    measure_all(&mut c);
    c.handle_scroll(300);
    assert_eq!(tab_offsets(&c), [200]);

    c.set_options(SyncOptions::new().with_tab_width(64));
    assert_eq!(tab_offsets(&c), [200, 128]);

    c.set_options(SyncOptions::new().with_tab_width(64).with_max_attempts(3));
    assert_eq!(tab_offsets(&c), [200, 128]);
}

#[test]
fn selection_callback_reports_sources() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut c = Controller::new(SyncOptions::default());
    c.set_on_selection_change(Some({
        let log = Arc::clone(&log);
        move |s: &SelectedSection, source: SelectionSource| {
            log.lock().unwrap().push((s.index, source));
        }
    }));

    c.set_sections(["A", "B", "C"]);
    measure_all(&mut c);
    c.handle_scroll(120);
    c.handle_scroll(130);
    c.handle_category_click("A", 0, 0);
    // Tapping the already selected tab does not fire again.
    c.handle_category_click("A", 0, 0);

    assert_eq!(
        *log.lock().unwrap(),
        [
            (0, SelectionSource::Reset),
            (1, SelectionSource::Scroll),
            (0, SelectionSource::Tap),
        ]
    );
}

#[test]
fn selection_is_updated_before_the_callback_runs() {
    let mut c = Controller::new(SyncOptions::default());
    c.set_sections(["A", "B", "C"]);
    measure_all(&mut c);
    c.set_on_selection_change(Some(|s: &SelectedSection, _: SelectionSource| {
        panic!("callback for {}", s.name);
    }));

    // A callback that unwinds must not leave the controller on the old section.
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        c.handle_scroll(120);
    }));
    assert!(result.is_err());
    assert_eq!(c.selected().unwrap().name, "B");

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        c.handle_category_click("C", 2, 0);
    }));
    assert!(result.is_err());
    assert_eq!(c.selected().unwrap().name, "C");
}

#[test]
fn tab_follower_offsets() {
    let start = TabFollower::new(80, TabAlign::Start);
    assert_eq!(start.offset_for(0, None), 0);
    assert_eq!(start.offset_for(3, Some(200)), 240);

    let center = TabFollower::new(80, TabAlign::Center);
    assert_eq!(center.offset_for(3, Some(200)), 240 + 40 - 100);
    assert_eq!(center.offset_for(0, Some(200)), 0);
    assert_eq!(center.offset_for(3, None), 240);

    let mut tabs = MockTabs {
        width: Some(200),
        ..MockTabs::default()
    };
    assert_eq!(center.follow(Some(&mut tabs), 3), Some(180));
    assert_eq!(tabs.offsets, [180]);
    assert_eq!(center.follow(None::<&mut MockTabs>, 3), None);
}

#[test]
fn scroller_gives_up_after_exactly_ten_attempts() {
    let registry = SectionHeightRegistry::new(3);
    let mut content = MockContent::new(false);
    let mut scroller = SectionScroller::new(10, 100);

    let mut outcome = scroller.scroll_to(Some(&mut content), &registry, 2, 0);
    let mut retries = 0u32;
    let mut now = 0u64;
    while let ScrollOutcome::Deferred { retry, due_ms, .. } = outcome {
        retries += 1;
        assert_eq!(retry, retries);
        assert_eq!(due_ms, now + 100);
        assert_eq!(scroller.next_due_ms(), Some(due_ms));
        assert_eq!(scroller.tick(Some(&mut content), &registry, due_ms - 1), None);
        now = due_ms;
        outcome = scroller
            .tick(Some(&mut content), &registry, now)
            .unwrap();
    }

    assert_eq!(retries, 9);
    assert_eq!(now, 900);
    assert_eq!(
        outcome,
        ScrollOutcome::GaveUp {
            index: 2,
            attempts: 10
        }
    );
    assert!(!outcome.is_scrolled());
    assert_eq!(content.index_calls.len(), 10);
    assert!(!scroller.is_pending());
}

#[test]
fn scroller_drops_retry_for_replaced_sequence() {
    let mut registry = SectionHeightRegistry::new(3);
    let mut content = MockContent::new(false);
    let mut scroller = SectionScroller::new(10, 100);

    let outcome = scroller.scroll_to(Some(&mut content), &registry, 1, 0);
    assert!(matches!(outcome, ScrollOutcome::Deferred { retry: 1, .. }));

    registry.reset(3);
    assert_eq!(
        scroller.tick(Some(&mut content), &registry, 100),
        Some(ScrollOutcome::Stale { index: 1 })
    );
    assert_eq!(content.index_calls, [1]);
}

#[test]
fn scroller_edge_cases() {
    let mut registry = SectionHeightRegistry::new(2);
    let mut content = MockContent::new(false);

    // The first attempt is always made, even with no budget.
    for max_attempts in [0, 1] {
        let mut single = SectionScroller::new(max_attempts, 100);
        assert_eq!(
            single.scroll_to(Some(&mut content), &registry, 1, 0),
            ScrollOutcome::GaveUp {
                index: 1,
                attempts: 1
            }
        );
        assert!(!single.is_pending());
    }
    assert_eq!(content.index_calls, [1, 1]);

    let mut two = SectionScroller::new(2, 100);
    assert!(matches!(
        two.scroll_to(Some(&mut content), &registry, 1, 0),
        ScrollOutcome::Deferred { retry: 1, .. }
    ));
    assert_eq!(
        two.tick(Some(&mut content), &registry, 100),
        Some(ScrollOutcome::GaveUp {
            index: 1,
            attempts: 2
        })
    );
    content.index_calls.clear();

    let mut scroller = SectionScroller::new(10, 100);
    assert_eq!(
        scroller.scroll_to(Some(&mut content), &registry, 2, 0),
        ScrollOutcome::Stale { index: 2 }
    );

    // Section 0 starts at 0 once it is measured, whatever comes after it.
    registry.record_height(0, 40);
    let outcome = scroller.scroll_to(Some(&mut content), &registry, 0, 0);
    assert_eq!(outcome, ScrollOutcome::Offset { index: 0, offset: 0 });
    assert!(outcome.is_scrolled());
    assert_eq!(outcome.index(), 0);

    // A new request replaces the pending retry.
    scroller.scroll_to(Some(&mut content), &registry, 1, 0);
    assert_eq!(scroller.pending_index(), Some(1));
    scroller.cancel();
    assert!(!scroller.is_pending());
    assert_eq!(scroller.tick(Some(&mut content), &registry, 1_000), None);
    // Cancelling with nothing pending is a no-op.
    scroller.cancel();
    assert!(!scroller.is_pending());
}

#[test]
fn scroll_error_messages() {
    assert_eq!(
        ScrollError::NotMeasured { index: 3 }.to_string(),
        "section 3 has not been measured yet"
    );
    assert_eq!(
        ScrollError::Detached.to_string(),
        "scroll container is not attached"
    );
}

#[test]
fn options_builders() {
    let o = SyncOptions::new()
        .with_tab_width(72)
        .with_tab_align(TabAlign::Center)
        .with_max_attempts(4)
        .with_retry_delay_ms(50)
        .with_settle_timeout_ms(250);
    assert_eq!(o.tab_width, 72);
    assert_eq!(o.tab_align, TabAlign::Center);
    assert_eq!(o.max_attempts, 4);
    assert_eq!(o.retry_delay_ms, 50);
    assert_eq!(o.settle_timeout_ms, 250);

    let d = SyncOptions::default();
    assert_eq!((d.tab_width, d.max_attempts, d.retry_delay_ms), (100, 10, 100));
}
