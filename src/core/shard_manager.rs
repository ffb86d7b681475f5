/*!
 * Shard Sizing Policy
 *
 * Hardware-aware shard count calculation for core-local arrays.
 *
 * # Design Rationale
 *
 * - **Power-of-2 shards**: core ids map to shards via bitwise AND (x & (n-1))
 * - **One shard per core**: the concurrency hint is the lower bound
 * - **Floor of 8**: single-core and unknown-topology hosts still get headroom
 *
 * The concurrency hint is exactly that, a hint. It may under- or over-report
 * (containers, cgroup quotas, offline CPUs); an inaccurate hint only changes
 * the collision rate, never correctness.
 */

use tracing::warn;

/// Hardware-aware shard configuration (pure functions)
pub struct ShardManager;

impl ShardManager {
    /// Smallest permitted shard shift (2^3 = 8 shards)
    pub const MIN_SHARD_SHIFT: u32 = 3;

    /// Smallest permitted shard count
    pub const MIN_SHARDS: usize = 1 << Self::MIN_SHARD_SHIFT;

    /// Largest shift that still fits a `usize` shard count
    const MAX_SHARD_SHIFT: u32 = usize::BITS - 1;

    /// Approximate number of processing units available to this process
    ///
    /// Returns 0 when the platform cannot report it; the sizing policy then
    /// falls back to [`ShardManager::MIN_SHARDS`].
    #[inline]
    pub fn cpu_count() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to detect CPU count, using minimum shard count");
                0
            })
    }

    /// Cache line size used for element padding
    ///
    /// x86-64 and aarch64 prefetch cache lines in adjacent pairs, so 128 bytes
    /// is the effective false-sharing granule there.
    #[inline(always)]
    pub const fn cache_line_size() -> usize {
        if cfg!(any(target_arch = "x86_64", target_arch = "aarch64")) {
            128
        } else {
            64
        }
    }

    /// Smallest `s >= 3` such that `2^s >= hint`
    #[inline]
    pub fn shard_shift(hint: usize) -> u32 {
        let mut shift = Self::MIN_SHARD_SHIFT;
        while shift < Self::MAX_SHARD_SHIFT && (1usize << shift) < hint {
            shift += 1;
        }
        shift
    }

    /// Shard count for a concurrency hint (always a power of 2, >= 8)
    #[inline]
    pub fn shard_count(hint: usize) -> usize {
        1usize << Self::shard_shift(hint)
    }

    /// Shard count for the detected hardware concurrency
    #[inline]
    pub fn shards() -> usize {
        Self::shard_count(Self::cpu_count())
    }
}
