// Conversion metrics
//
// Lightweight counters for conversions and game name lookups

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Conversion and lookup metrics.
///
/// Uses atomic operations so a single instance can be shared through an `Arc`
/// between the CLI and the export service without locks.
#[derive(Debug)]
pub struct Metrics {
    /// Conversions that produced a config
    pub conversions_succeeded: AtomicUsize,

    /// Conversions rejected (empty input or unknown key)
    pub conversions_failed: AtomicUsize,

    /// Non-blank lines read by successful conversions
    pub lines_processed: AtomicU64,

    /// Game name lookups started for `STEAM_<appid>` ids
    pub lookups_attempted: AtomicU64,

    /// Lookups that produced a container name
    pub lookups_resolved: AtomicU64,

    /// Lookups that returned an error
    pub lookups_failed: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            conversions_succeeded: AtomicUsize::new(0),
            conversions_failed: AtomicUsize::new(0),
            lines_processed: AtomicU64::new(0),
            lookups_attempted: AtomicU64::new(0),
            lookups_resolved: AtomicU64::new(0),
            lookups_failed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_conversion_succeeded(&self, lines: usize) {
        self.conversions_succeeded.fetch_add(1, Ordering::Relaxed);
        self.lines_processed
            .fetch_add(lines as u64, Ordering::Relaxed);
    }

    pub fn record_conversion_failed(&self) {
        self.conversions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup_attempted(&self) {
        self.lookups_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup_resolved(&self) {
        self.lookups_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup_failed(&self) {
        self.lookups_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average number of lines per successful conversion
    pub fn avg_lines_per_conversion(&self) -> f64 {
        let lines = self.lines_processed.load(Ordering::Relaxed);
        let count = self.conversions_succeeded.load(Ordering::Relaxed);
        if count > 0 {
            lines as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Conversion Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Conversions: {} succeeded, {} failed ({:.1} lines avg)",
            self.conversions_succeeded.load(Ordering::Relaxed),
            self.conversions_failed.load(Ordering::Relaxed),
            self.avg_lines_per_conversion()
        );
        tracing::info!(
            "Lookups: {} attempted, {} resolved, {} failed",
            self.lookups_attempted.load(Ordering::Relaxed),
            self.lookups_resolved.load(Ordering::Relaxed),
            self.lookups_failed.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.conversions_succeeded.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.conversions_failed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_conversions() {
        let metrics = Metrics::new();

        metrics.record_conversion_succeeded(10);
        metrics.record_conversion_succeeded(20);
        metrics.record_conversion_failed();

        assert_eq!(metrics.conversions_succeeded.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.conversions_failed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.lines_processed.load(Ordering::Relaxed), 30);
        assert_eq!(metrics.avg_lines_per_conversion(), 15.0);
    }

    #[test]
    fn test_avg_lines_no_conversions() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_lines_per_conversion(), 0.0);
    }

    #[test]
    fn test_lookup_counters() {
        let metrics = Metrics::new();

        metrics.record_lookup_attempted();
        metrics.record_lookup_attempted();
        metrics.record_lookup_resolved();
        metrics.record_lookup_failed();

        assert_eq!(metrics.lookups_attempted.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.lookups_resolved.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.lookups_failed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_uptime() {
        let metrics = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }
}
