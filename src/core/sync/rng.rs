/*!
 * Thread-Local Shard Selector
 *
 * Uniform random shard choice for threads whose core id is unknown.
 *
 * Each thread owns its own `SmallRng`, seeded lazily from OS entropy on first
 * use. Nothing is shared between threads, so the fallback path adds no
 * contention of its own.
 */

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use tracing::debug;

thread_local! {
    static SHARD_RNG: RefCell<SmallRng> = RefCell::new(seed_thread_rng());
}

fn seed_thread_rng() -> SmallRng {
    debug!(
        thread = ?std::thread::current().id(),
        "core id unavailable, seeding thread-local shard selector"
    );
    SmallRng::from_entropy()
}

/// Uniform draw from `[0, bound)` using this thread's generator
///
/// `bound` must be non-zero.
#[inline]
pub fn uniform(bound: usize) -> usize {
    debug_assert!(bound > 0, "uniform bound must be non-zero");
    SHARD_RNG.with(|rng| rng.borrow_mut().gen_range(0..bound))
}
