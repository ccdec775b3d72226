//! Pipeline counters
//!
//! Recorded through the `metrics` facade; without an installed recorder these
//! calls are no-ops.

use metrics::counter;

use crate::domain::pipeline::Subject;

pub fn record_cache_hit(request: &'static str) {
    counter!("pipeline_cache_hits_total", "request" => request).increment(1);
}

pub fn record_cache_miss(request: &'static str) {
    counter!("pipeline_cache_misses_total", "request" => request).increment(1);
}

/// A cache operation that failed or timed out and was recovered locally
pub fn record_cache_error(operation: &'static str) {
    counter!("pipeline_cache_errors_total", "operation" => operation).increment(1);
}

pub fn record_invalidation(subject: Subject, purged: usize) {
    counter!("pipeline_invalidations_total", "subject" => subject.as_str()).increment(1);
    counter!("pipeline_invalidated_keys_total", "subject" => subject.as_str())
        .increment(purged as u64);
}

pub fn record_unmapped_subject(subject: Subject) {
    counter!(
        "pipeline_unmapped_invalidation_subject_total",
        "subject" => subject.as_str()
    )
    .increment(1);
}
