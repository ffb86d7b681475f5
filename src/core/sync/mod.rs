/*!
 * Core-Local Sharding
 *
 * Per-core storage that spreads "one" hot value across independent shards:
 * - `CoreLocalArray` owns the shards and resolves core -> shard
 * - `CoreIdSource` reports the current core (or nothing)
 * - `rng` picks a shard when the core is unknown
 * - `CacheAligned` pads elements so shards do not share cache lines
 *
 * # Use Cases
 *
 * - **Hot counters**: per-core `AtomicU64`, summed on read
 * - **Statistics**: per-core accumulators merged by a reporter
 * - **Caches**: per-core slots owned by whichever thread runs there
 */

mod config;
mod core_id;
mod core_local;
mod padded;
pub mod rng;

pub use config::{ArrayConfig, CONCURRENCY_ENV};
pub(crate) use config::{read_env, NUMBER_EXPECTED};
pub use core_id::{CoreIdSource, FixedCore, NoCoreId, PhysicalCore};
pub use core_local::{CoreLocalArray, CoreLocalArrayBuilder};
pub use padded::CacheAligned;
