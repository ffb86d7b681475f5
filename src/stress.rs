/*!
 * Stress Run
 *
 * Drives a per-core counter array from many threads and reports how the
 * increments landed across shards. Backs the `core-local-stress` binary.
 *
 * Environment variables:
 * - CORE_LOCAL_CONCURRENCY: shard sizing hint (default: detected)
 * - CORE_LOCAL_THREADS: worker threads (default: detected parallelism)
 * - CORE_LOCAL_ITERATIONS: increments per worker (default: 1000000)
 * - CORE_LOCAL_CORE_SOURCE: `physical` (default) or `random`
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::shard_manager::ShardManager;
use crate::core::sync::{
    read_env, ArrayConfig, CacheAligned, CoreIdSource, CoreLocalArray, NoCoreId, PhysicalCore,
    NUMBER_EXPECTED,
};
use crate::monitoring::span_operation;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

pub const THREADS_ENV: &str = "CORE_LOCAL_THREADS";
pub const ITERATIONS_ENV: &str = "CORE_LOCAL_ITERATIONS";
pub const CORE_SOURCE_ENV: &str = "CORE_LOCAL_CORE_SOURCE";

pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

const SOURCE_EXPECTED: &str = "`physical` or `random`";

/// How workers resolve their shard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Operating system core id
    Physical,
    /// Always the thread-local random fallback
    Random,
}

/// Stress run parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StressConfig {
    pub array: ArrayConfig,
    pub threads: usize,
    pub iterations: u64,
    pub source: SourceKind,
}

impl StressConfig {
    /// Read all parameters from the environment
    pub fn from_env() -> ConfigResult<Self> {
        let array = ArrayConfig::from_env()?;

        let threads = match env_number(THREADS_ENV)? {
            Some(n) => usize::try_from(n).map_err(|e| {
                ConfigError::invalid_env(THREADS_ENV, &n.to_string(), e, NUMBER_EXPECTED)
            })?,
            None => ShardManager::cpu_count().max(1),
        };
        if threads == 0 {
            return Err(ConfigError::InvalidValue {
                field: "threads".into(),
                reason: "must be at least 1".into(),
            });
        }

        let iterations = env_number(ITERATIONS_ENV)?.unwrap_or(DEFAULT_ITERATIONS);

        let source = match read_env(CORE_SOURCE_ENV, SOURCE_EXPECTED)?.as_deref() {
            None | Some("physical") => SourceKind::Physical,
            Some("random") => SourceKind::Random,
            Some(other) => {
                return Err(ConfigError::invalid_env(
                    CORE_SOURCE_ENV,
                    other,
                    "unknown core source",
                    SOURCE_EXPECTED,
                ))
            }
        };

        Ok(Self {
            array,
            threads,
            iterations,
            source,
        })
    }
}

fn env_number(var: &str) -> ConfigResult<Option<u64>> {
    read_env(var, NUMBER_EXPECTED)?
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| ConfigError::invalid_env(var, &raw, e, NUMBER_EXPECTED))
        })
        .transpose()
}

/// Outcome of a stress run
#[derive(Debug, Serialize)]
pub struct StressReport {
    pub config: StressConfig,
    pub shard_count: usize,
    pub expected_total: u64,
    pub observed_total: u64,
    pub shards_used: usize,
    pub per_shard: Vec<u64>,
    pub elapsed_ms: u128,
}

type Counters<S> = CoreLocalArray<CacheAligned<AtomicU64>, S>;

/// Run the configured workload to completion
pub fn run(config: StressConfig) -> StressReport {
    match config.source {
        SourceKind::Physical => {
            let counters = CoreLocalArray::builder()
                .config(config.array)
                .core_source(PhysicalCore)
                .build();
            run_with(config, counters)
        }
        SourceKind::Random => {
            let counters = CoreLocalArray::builder()
                .config(config.array)
                .core_source(NoCoreId)
                .build();
            run_with(config, counters)
        }
    }
}

fn run_with<S>(config: StressConfig, counters: Counters<S>) -> StressReport
where
    S: CoreIdSource + 'static,
{
    let counters = Arc::new(counters);
    let op = span_operation("stress");
    let _entered = op.enter();

    info!(
        threads = config.threads,
        iterations = config.iterations,
        shard_count = counters.size(),
        source = ?config.source,
        "Starting stress run"
    );

    let handles: Vec<_> = (0..config.threads)
        .map(|worker| {
            let counters = Arc::clone(&counters);
            let iterations = config.iterations;
            thread::Builder::new()
                .name(format!("stress-{}", worker))
                .spawn(move || {
                    for _ in 0..iterations {
                        counters.access_current().fetch_add(1, Ordering::Relaxed);
                    }
                })
        })
        .collect();

    let mut completed = 0u64;
    for handle in handles {
        match handle {
            Ok(handle) => {
                if handle.join().is_err() {
                    warn!("Stress worker panicked");
                } else {
                    completed += 1;
                }
            }
            Err(e) => warn!(error = %e, "Failed to spawn stress worker"),
        }
    }

    let per_shard: Vec<u64> = counters
        .iter()
        .map(|c| c.load(Ordering::Relaxed))
        .collect();
    let observed_total = per_shard.iter().sum();
    let expected_total = completed * config.iterations;
    op.record_items_processed(observed_total);

    StressReport {
        shard_count: counters.size(),
        expected_total,
        observed_total,
        shards_used: per_shard.iter().filter(|&&n| n > 0).count(),
        per_shard,
        elapsed_ms: op.elapsed().as_millis(),
        config,
    }
}
