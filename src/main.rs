/*!
 * Core-Local Stress Driver
 *
 * Hammers a per-core counter array from many threads and reports how the
 * increments landed across shards.
 *
 * Environment variables:
 * - CORE_LOCAL_CONCURRENCY: shard sizing hint (default: detected)
 * - CORE_LOCAL_THREADS: worker threads (default: detected parallelism)
 * - CORE_LOCAL_ITERATIONS: increments per worker (default: 1000000)
 * - CORE_LOCAL_CORE_SOURCE: `physical` (default) or `random`
 * - CORE_LOCAL_TRACE_JSON / RUST_LOG: log output
 */

use core_local::init_tracing;
use core_local::stress::{self, StressConfig};
use tracing::{info, warn};

fn main() -> miette::Result<()> {
    init_tracing();

    let config = StressConfig::from_env()?;
    info!(
        hint = config.array.resolved_hint(),
        shard_count = config.array.shard_count(),
        "Configuration loaded"
    );

    let report = stress::run(config);

    if report.observed_total != report.expected_total {
        warn!(
            expected = report.expected_total,
            observed = report.observed_total,
            "Shard totals do not add up"
        );
    }
    info!(
        total = report.observed_total,
        shards_used = report.shards_used,
        elapsed_ms = report.elapsed_ms as u64,
        "Stress run complete"
    );

    let json = serde_json::to_string_pretty(&report).map_err(|e| miette::miette!("{}", e))?;
    println!("{}", json);
    Ok(())
}
