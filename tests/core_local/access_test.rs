/*!
 * Shard Access Tests
 * Index range, core masking, and aliasing between accessors
 */

use core_local::{CoreLocalArray, FixedCore, NoCoreId};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[test]
fn test_index_in_range_physical() {
    let array: CoreLocalArray<u8> = CoreLocalArray::new();
    for _ in 0..10_000 {
        let (_, index) = array.access_current_with_index();
        assert!(index < array.size());
    }
}

#[test]
fn test_index_in_range_without_core_id() {
    let array = CoreLocalArray::<u8>::builder()
        .concurrency_hint(4)
        .core_source(NoCoreId)
        .build();
    for _ in 0..10_000 {
        let (_, index) = array.access_current_with_index();
        assert!(index < array.size());
    }
}

#[test]
fn test_fixed_core_is_masked() {
    // Spans core ids below, at, and above the shard count
    for core in [0usize, 1, 5, 7, 8, 9, 15, 16, 31, 33, 255, 4096 + 3] {
        let array = CoreLocalArray::<u8>::builder()
            .concurrency_hint(0)
            .core_source(FixedCore(core))
            .build();
        for _ in 0..10 {
            let (_, index) = array.access_current_with_index();
            assert_eq!(index, core & (array.size() - 1));
        }
    }
}

#[test]
fn test_closure_source_sequence() {
    let next = AtomicUsize::new(0);
    let array = CoreLocalArray::<u8>::builder()
        .concurrency_hint(16)
        .core_source(|| Some(next.fetch_add(1, Ordering::Relaxed)))
        .build();

    let indices: Vec<usize> = (0..20).map(|_| array.current_shard_index()).collect();
    let expected: Vec<usize> = (0..20).map(|core| core & 15).collect();
    assert_eq!(indices, expected);
}

#[test]
fn test_current_and_indexed_alias() {
    let array = CoreLocalArray::<AtomicU64>::builder()
        .core_source(FixedCore(3))
        .build();

    let (current, index) = array.access_current_with_index();
    current.fetch_add(11, Ordering::Relaxed);
    assert_eq!(array.access_at_shard(index).load(Ordering::Relaxed), 11);

    array.access_at_shard(index).fetch_add(1, Ordering::Relaxed);
    assert_eq!(array.access_current().load(Ordering::Relaxed), 12);

    assert!(std::ptr::eq(current, array.access_at_shard(index)));
    assert!(std::ptr::eq(current, &array.as_slice()[index]));
}

#[test]
fn test_fallback_alias() {
    let array = CoreLocalArray::<AtomicU64>::builder()
        .core_source(NoCoreId)
        .build();

    for _ in 0..100 {
        let (elem, index) = array.access_current_with_index();
        elem.fetch_add(1, Ordering::Relaxed);
        assert!(std::ptr::eq(elem, array.access_at_shard(index)));
    }

    let total: u64 = array.iter().map(|c| c.load(Ordering::Relaxed)).sum();
    assert_eq!(total, 100);
}

#[test]
fn test_storage_address_fixed() {
    let array: CoreLocalArray<u64> = CoreLocalArray::new();
    let before = array.as_slice().as_ptr();
    for _ in 0..1000 {
        let _ = array.access_current();
    }
    assert_eq!(before, array.as_slice().as_ptr());
}

#[test]
fn test_iterate_all_shards() {
    let array = CoreLocalArray::<usize>::builder()
        .concurrency_hint(10)
        .build_with(|shard| shard);

    let by_index: Vec<usize> = (0..array.size()).map(|i| *array.access_at_shard(i)).collect();
    let by_iter: Vec<usize> = (&array).into_iter().copied().collect();
    assert_eq!(by_index, by_iter);
    assert_eq!(by_iter, (0..16).collect::<Vec<_>>());
}

#[test]
#[should_panic]
fn test_access_at_size_is_contract_violation() {
    let array = CoreLocalArray::<u8>::builder().concurrency_hint(0).build();
    let _ = array.access_at_shard(array.size());
}

#[test]
#[should_panic]
fn test_access_far_out_of_range_is_contract_violation() {
    let array = CoreLocalArray::<u8>::builder().concurrency_hint(0).build();
    let _ = array.access_at_shard(usize::MAX);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn test_debug_assertion_message() {
    let array = CoreLocalArray::<u8>::builder().concurrency_hint(0).build();
    let _ = array.access_at_shard(8);
}
