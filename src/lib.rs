/*!
 * Core-Local Library
 * Per-core sharded storage for contended values
 */

pub mod core;
pub mod monitoring;
pub mod stress;

// Re-exports
pub use crate::core::errors::{ConfigError, ConfigResult};
pub use crate::core::shard_manager::ShardManager;
pub use crate::core::sync::{
    ArrayConfig, CacheAligned, CoreIdSource, CoreLocalArray, CoreLocalArrayBuilder, FixedCore,
    NoCoreId, PhysicalCore,
};
pub use monitoring::init_tracing;
