use scrollspy_adapter::{
    ContentScroller, ScrollError, SelectedSection, SelectionSource, SyncController, SyncOptions,
    TabAlign, TabStrip,
};

/// A fake list that can only scroll natively to sections it has rendered.
struct MenuList {
    rendered: usize,
    offset: u64,
}

impl ContentScroller for MenuList {
    fn scroll_to_index(&mut self, index: usize) -> Result<(), ScrollError> {
        if index < self.rendered {
            println!("  list: native scroll to section {index}");
            Ok(())
        } else {
            Err(ScrollError::NotMaterialized { index })
        }
    }

    fn scroll_to_offset(&mut self, offset: u64) {
        println!("  list: scroll to offset {offset}");
        self.offset = offset;
    }
}

struct CategoryTabs;

impl TabStrip for CategoryTabs {
    fn scroll_to_offset(&mut self, offset: u64) {
        println!("  tabs: scroll to x={offset}");
    }

    fn viewport_width(&self) -> Option<u32> {
        Some(360)
    }
}

fn main() {
    // Example: a menu screen with a category tab strip above a long list.
    //
    // The adapter would:
    // - call set_sections when the menu loads
    // - forward layout heights, scroll events and tab taps
    // - call tick(now_ms) from a timer so retries can run
    let options = SyncOptions::new()
        .with_tab_width(96)
        .with_tab_align(TabAlign::Center);
    let mut c = SyncController::with_handles(
        options,
        MenuList {
            rendered: 2,
            offset: 0,
        },
        CategoryTabs,
    );
    c.set_on_selection_change(Some(|s: &SelectedSection, source: SelectionSource| {
        println!("selected {} ({source:?})", s.name);
    }));

    c.set_sections(["Burgers", "Sides", "Drinks", "Desserts"]);
    c.record_height(0, 480);
    c.record_height(1, 320);

    // User drags through the list.
    c.handle_drag_start();
    for offset in [0u64, 200, 480, 700] {
        c.handle_scroll(offset);
    }
    c.handle_scroll_end();

    // Tap a category that is neither rendered nor measured yet.
    c.handle_category_click("Desserts", 3, 0);
    let mut now_ms = 0u64;
    while c.pending_scroll().is_some() {
        now_ms += 100;
        if now_ms == 300 {
            // Layout catches up with the rest of the menu.
            c.record_height(2, 260);
            c.record_height(3, 400);
        }
        if let Some(outcome) = c.tick(now_ms) {
            println!("t={now_ms} {outcome:?}");
        }
    }

    let landed = c.content().map(|l| l.offset).unwrap_or(0);
    c.handle_scroll(landed);
    println!(
        "done: selected={:?} phase={:?} suppressed={}",
        c.selected().map(|s| &s.name),
        c.phase(),
        c.is_suppressed()
    );
}
