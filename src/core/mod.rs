/*!
 * Core Module
 * Sharding primitives, sizing policy, and error handling
 */

pub mod errors;
pub mod shard_manager;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use shard_manager::ShardManager;
pub use sync::{
    ArrayConfig, CacheAligned, CoreIdSource, CoreLocalArray, CoreLocalArrayBuilder, FixedCore,
    NoCoreId, PhysicalCore,
};
