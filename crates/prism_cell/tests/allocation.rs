//! Checks that inline values never touch the allocator and boxed values release what they take.

#![expect(unsafe_code, reason = "Installing a counting global allocator requires `unsafe`.")]

use prism_cell::ValueCell;
use std::{
    alloc::{GlobalAlloc, Layout, System},
    cell::Cell,
};

struct CountingAllocator;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
    static DEALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

// SAFETY: every call is forwarded to the system allocator unchanged.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
        // SAFETY: upheld by the caller.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let _ = DEALLOCATIONS.try_with(|count| count.set(count.get() + 1));
        // SAFETY: upheld by the caller.
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn counts() -> (usize, usize) {
    (ALLOCATIONS.with(Cell::get), DEALLOCATIONS.with(Cell::get))
}

#[test]
fn should_allocate_only_for_large_values() {
    let mut cell = ValueCell::<3>::new();

    let before = counts();
    cell.set([1_u64, 2]);
    cell.set(3.5_f64);
    cell.set_unowned(7_u32);
    assert!(cell.is_inline());
    cell.destroy();
    assert_eq!(counts(), before);

    let before = counts();
    cell.set([0_u64; 8]);
    assert!(!cell.is_inline());
    let after_set = counts();
    assert_eq!(after_set.0 - before.0, 1);
    assert_eq!(after_set.1 - before.1, 0);

    cell.destroy();
    let after_destroy = counts();
    assert_eq!(after_destroy.0 - before.0, 1);
    assert_eq!(after_destroy.1 - before.1, 1);

    let before = counts();
    cell.set_unowned([0_u64; 8]);
    drop(cell);
    let after_drop = counts();
    assert_eq!(after_drop.0 - before.0, 1);
    assert_eq!(after_drop.1 - before.1, 1);
}
