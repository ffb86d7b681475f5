/*!
 * Shard Sizing Tests
 * Power-of-2 sizing, the 8-shard floor, and the hardware hint
 */

use core_local::{ArrayConfig, CoreLocalArray, ShardManager};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_zero_hint_uses_floor() {
    let array: CoreLocalArray<u64> = CoreLocalArray::with_config(&ArrayConfig::with_hint(0));
    assert_eq!(array.size(), 8);
}

#[test]
fn test_hint_rounds_up() {
    let array: CoreLocalArray<u64> = CoreLocalArray::with_config(&ArrayConfig::with_hint(10));
    assert_eq!(array.size(), 16);
}

#[test]
fn test_detected_hint() {
    let hint = ShardManager::cpu_count();
    let array: CoreLocalArray<u64> = CoreLocalArray::new();

    assert!(array.size().is_power_of_two());
    assert!(array.size() >= 8);
    assert!(array.size() >= hint);
    // Smallest such power of two
    assert!(array.size() == 8 || array.size() / 2 < hint);
}

#[test]
fn test_size_is_stable() {
    let array: CoreLocalArray<u8> = CoreLocalArray::new();
    let first = array.size();
    for _ in 0..100 {
        let _ = array.access_current();
        assert_eq!(array.size(), first);
    }
}

proptest! {
    #[test]
    fn prop_size_is_smallest_power_of_two(hint in 0usize..100_000) {
        let size = ShardManager::shard_count(hint);

        prop_assert!(size.is_power_of_two());
        prop_assert!(size >= 8);
        prop_assert!(size >= hint);
        prop_assert!(size == 8 || size / 2 < hint);
    }

    #[test]
    fn prop_config_matches_array(hint in 0usize..4096) {
        let config = ArrayConfig::with_hint(hint);
        let array: CoreLocalArray<u8> = CoreLocalArray::with_config(&config);
        prop_assert_eq!(array.size(), config.shard_count());
        prop_assert_eq!(array.as_slice().len(), array.size());
    }
}
