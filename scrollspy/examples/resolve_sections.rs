use scrollspy::{SectionHeightRegistry, resolve_offset};

fn main() {
    // Three sections; the first one has not been laid out yet.
    let mut registry = SectionHeightRegistry::new(3);
    registry.record_height(1, 200);
    registry.record_height(2, 150);
    println!("before: starts={:?}", registry.cumulative_heights());

    // Layout reports the first section; every start below it shifts.
    registry.record_height(0, 100);
    let starts = registry.cumulative_heights();
    println!("after: starts={starts:?} total={}", registry.total_height());

    for offset in [0u64, 50, 100, 250, 300, 999] {
        println!(
            "offset={offset} linear={:?} fenwick={:?}",
            resolve_offset(offset, &starts),
            registry.index_at_offset(offset)
        );
    }
}
