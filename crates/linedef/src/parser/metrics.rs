use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

/// A wrapper that forces the wrapped data onto its own cache line(s).
///
/// Uses `#[repr(align(64))]` so that each group starts on a 64-byte
/// boundary and parser threads updating different groups do not
/// invalidate each other's cache lines.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Line outcome counters (hottest path - updated per log line)
#[derive(Debug, Default)]
pub struct OutcomeMetrics {
    pub matched: AtomicU64,
    pub unmatched: AtomicU64,
    pub too_long: AtomicU64,
}

/// Field-level conversion failures
#[derive(Debug, Default)]
pub struct AnomalyMetrics {
    pub fields: AtomicU64,
    pub records: AtomicU64,
}

/// Performance totals over lines that were examined (aggregate timing and counts)
#[derive(Debug, Default)]
pub struct TotalMetrics {
    pub time_nanos: AtomicU64,
    pub count: AtomicU64,
}

/// Counters for a stream of parsed lines.
///
/// Shared between parser instances through an `Arc`. All operations use
/// `Ordering::Relaxed`; `snapshot()` reads are not atomic across fields,
/// so the totals may be momentarily out of step with the outcome counts.
#[derive(Debug, Default)]
pub struct ParsingMetrics {
    pub outcomes: CacheAligned<OutcomeMetrics>,
    pub anomalies: CacheAligned<AnomalyMetrics>,
    pub totals: CacheAligned<TotalMetrics>,
}

impl ParsingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a matched line and the number of fields that failed conversion
    #[inline]
    pub fn record_match(&self, anomalies: usize, time_nanos: u64) {
        self.record_time(time_nanos);
        self.outcomes.0.matched.fetch_add(1, Ordering::Relaxed);
        if anomalies > 0 {
            self.anomalies.0.records.fetch_add(1, Ordering::Relaxed);
            self.anomalies.0.fields.fetch_add(anomalies as u64, Ordering::Relaxed);
        }
    }

    /// Record a line no shape recognized
    #[inline]
    pub fn record_unmatched(&self, time_nanos: u64) {
        self.record_time(time_nanos);
        self.outcomes.0.unmatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a line rejected for exceeding the size limit. It was never
    /// examined, so it does not count toward the parse time average.
    #[inline]
    pub fn record_too_long(&self) {
        self.outcomes.0.too_long.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_time(&self, time_nanos: u64) {
        self.totals.0.count.fetch_add(1, Ordering::Relaxed);
        self.totals.0.time_nanos.fetch_add(time_nanos, Ordering::Relaxed);
    }

    /// Create a read-only snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let examined = self.totals.0.count.load(Ordering::Relaxed);
        let total_time_ns = self.totals.0.time_nanos.load(Ordering::Relaxed);
        let matched = self.outcomes.0.matched.load(Ordering::Relaxed);
        let unmatched = self.outcomes.0.unmatched.load(Ordering::Relaxed);
        let too_long = self.outcomes.0.too_long.load(Ordering::Relaxed);
        let total_lines = matched + unmatched + too_long;

        MetricsSnapshot {
            total_lines,
            matched,
            unmatched,
            too_long,
            field_anomalies: self.anomalies.0.fields.load(Ordering::Relaxed),
            records_with_anomalies: self.anomalies.0.records.load(Ordering::Relaxed),
            match_rate: if total_lines > 0 {
                matched as f64 / total_lines as f64
            } else {
                1.0
            },
            avg_parse_time_us: if examined > 0 {
                (total_time_ns as f64 / examined as f64) / 1000.0
            } else {
                0.0
            },
        }
    }
}

/// A read-only snapshot of parsing metrics, serializable for logging.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_lines: u64,
    pub matched: u64,
    pub unmatched: u64,
    pub too_long: u64,
    pub field_anomalies: u64,
    pub records_with_anomalies: u64,
    pub match_rate: f64,
    pub avg_parse_time_us: f64,
}
