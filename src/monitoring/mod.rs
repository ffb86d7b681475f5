/*!
 * Monitoring
 * Structured tracing setup for binaries and tests
 */

mod tracer;

pub use tracer::{init_tracing, span_operation, OperationSpan, TRACE_JSON_ENV};
