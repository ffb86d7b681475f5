/*!
 * Core-Local Array
 *
 * One logical value split into per-core shards.
 *
 * # Design
 *
 * - Power-of-2 shard count, fixed at construction (>= 8, >= CPU count)
 * - Core id -> shard via `core & (size - 1)`
 * - Unknown core id -> uniform random shard from a thread-local generator
 * - Single boxed slice, never reallocated: element references live as long
 *   as the array
 *
 * The array provides placement, not synchronization. Two threads that land on
 * the same shard race on that element exactly as they would on a single
 * shared value, so the element type brings its own (atomics, locks), or each
 * shard must have a single owner. Combining shards into a global view is the
 * caller's job; `iter()` exists for that.
 *
 * # Example
 *
 * ```
 * use core_local::core::sync::{CacheAligned, CoreLocalArray};
 * use std::sync::atomic::{AtomicU64, Ordering};
 *
 * let hits: CoreLocalArray<CacheAligned<AtomicU64>> = CoreLocalArray::new();
 *
 * hits.access_current().fetch_add(1, Ordering::Relaxed);
 *
 * let total: u64 = hits.iter().map(|c| c.load(Ordering::Relaxed)).sum();
 * assert_eq!(total, 1);
 * ```
 */

use super::config::ArrayConfig;
use super::core_id::{CoreIdSource, PhysicalCore};
use super::rng;
use crate::core::shard_manager::ShardManager;
use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use tracing::debug;

/// Array of per-core values
///
/// `S` supplies the current core id; the default asks the operating system.
pub struct CoreLocalArray<T, S = PhysicalCore> {
    /// Fixed shard storage (never resizes, stable addresses)
    data: Box<[T]>,
    size_shift: u32,
    source: S,
}

impl<T: Default> CoreLocalArray<T> {
    /// Create an array sized for the detected hardware concurrency
    pub fn new() -> Self {
        Self::with_config(&ArrayConfig::detect())
    }

    /// Create an array sized by `config`
    pub fn with_config(config: &ArrayConfig) -> Self {
        Self::builder().config(*config).build()
    }
}

impl<T: Default> Default for CoreLocalArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CoreLocalArray<T> {
    /// Start building an array with a custom hint, core source, or initializer
    pub fn builder() -> CoreLocalArrayBuilder<T, PhysicalCore> {
        CoreLocalArrayBuilder::new()
    }
}

impl<T, S: CoreIdSource> CoreLocalArray<T, S> {
    fn from_parts(hint: usize, source: S, init: impl FnMut(usize) -> T) -> Self {
        let size_shift = ShardManager::shard_shift(hint);
        let size = 1usize << size_shift;
        let data: Box<[T]> = (0..size).map(init).collect();

        debug!(
            hint,
            shard_count = size,
            elem_size = size_of::<T>(),
            "core-local array allocated"
        );

        Self {
            data,
            size_shift,
            source,
        }
    }

    /// Number of shards (power of 2, at least 8)
    #[inline(always)]
    pub fn size(&self) -> usize {
        1usize << self.size_shift
    }

    /// log2 of [`size`](Self::size)
    #[inline(always)]
    pub fn shard_shift(&self) -> u32 {
        self.size_shift
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.size() - 1
    }

    /// Shard the calling thread should use right now
    ///
    /// Core ids are masked with `size - 1`. This spreads load evenly only when
    /// ids are small and dense; large or sparse ids (e.g. APIC ids with gaps)
    /// can fold several cores onto one shard.
    #[inline]
    pub fn current_shard_index(&self) -> usize {
        let Some(core) = self.source.current_core() else {
            // core id unavailable, pick a shard at random
            return self.fallback_index();
        };
        core & self.mask()
    }

    #[cold]
    #[inline(never)]
    fn fallback_index(&self) -> usize {
        rng::uniform(self.size())
    }

    /// Element for the core the calling thread is running on
    #[inline]
    pub fn access_current(&self) -> &T {
        self.access_current_with_index().0
    }

    /// Element for the current core, plus its shard index
    ///
    /// The index may be cached to skip repeated core lookups, at the cost of
    /// using a stale shard after the thread migrates.
    #[inline]
    pub fn access_current_with_index(&self) -> (&T, usize) {
        let index = self.current_shard_index();
        (self.access_at_shard(index), index)
    }

    /// Element at a known shard index
    ///
    /// # Panics
    ///
    /// `index` must be below [`size`](Self::size). An out-of-range index is a
    /// caller bug: it fails the debug assertion in debug builds and the slice
    /// bounds check in release builds. It is never wrapped.
    #[inline]
    pub fn access_at_shard(&self, index: usize) -> &T {
        debug_assert!(
            index < self.size(),
            "shard index {} out of range for {} shards",
            index,
            self.size()
        );
        &self.data[index]
    }

    /// Exclusive access to the element at a known shard index
    ///
    /// # Panics
    ///
    /// Same contract as [`access_at_shard`](Self::access_at_shard).
    #[inline]
    pub fn access_at_shard_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(
            index < self.size(),
            "shard index {} out of range for {} shards",
            index,
            self.size()
        );
        &mut self.data[index]
    }

    /// All shards in index order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// All shards in index order, exclusively
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Shards as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The core id source in use
    pub fn core_source(&self) -> &S {
        &self.source
    }
}

impl<'a, T, S: CoreIdSource> IntoIterator for &'a CoreLocalArray<T, S> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for CoreLocalArray<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreLocalArray")
            .field("shard_count", &(1usize << self.size_shift))
            .field("shards", &self.data)
            .finish()
    }
}

/// Builder for CoreLocalArray
pub struct CoreLocalArrayBuilder<T, S> {
    config: ArrayConfig,
    source: S,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CoreLocalArrayBuilder<T, PhysicalCore> {
    /// Create a builder with the detected hint and the OS core id
    pub fn new() -> Self {
        Self {
            config: ArrayConfig::detect(),
            source: PhysicalCore,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for CoreLocalArrayBuilder<T, PhysicalCore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: CoreIdSource> CoreLocalArrayBuilder<T, S> {
    /// Use an explicit concurrency hint instead of detecting one
    pub fn concurrency_hint(mut self, hint: usize) -> Self {
        self.config.concurrency_hint = Some(hint);
        self
    }

    /// Use a prepared configuration
    pub fn config(mut self, config: ArrayConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve the current core through `source`
    pub fn core_source<S2: CoreIdSource>(self, source: S2) -> CoreLocalArrayBuilder<T, S2> {
        CoreLocalArrayBuilder {
            config: self.config,
            source,
            _marker: PhantomData,
        }
    }

    /// Build with each shard produced by `init(shard_index)`
    pub fn build_with(self, init: impl FnMut(usize) -> T) -> CoreLocalArray<T, S> {
        CoreLocalArray::from_parts(self.config.resolved_hint(), self.source, init)
    }
}

impl<T: Default, S: CoreIdSource> CoreLocalArrayBuilder<T, S> {
    /// Build with default-constructed shards
    pub fn build(self) -> CoreLocalArray<T, S> {
        self.build_with(|_| T::default())
    }
}
