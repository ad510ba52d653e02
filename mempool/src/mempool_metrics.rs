use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

/// Metrics exposed by the mempool under the `mempool` namespace.
///
/// The histograms record nanoseconds; dashboards derive the average from
/// the exported sum and count series.
#[derive(Clone)]
pub struct MempoolMetrics {
    pub(crate) add: Histogram,
    pub(crate) build_overhead: Histogram,
    pub(crate) set_min_timestamp: Histogram,
    pub(crate) size: Gauge,
}

impl MempoolMetrics {
    /// Creates the metrics together with a registry they are registered in.
    pub(crate) fn new() -> (Self, Registry) {
        let metrics = MempoolMetrics {
            add: Histogram::new(exponential_buckets(1_000.0, 4.0, 12)),
            build_overhead: Histogram::new(exponential_buckets(1_000.0, 4.0, 12)),
            set_min_timestamp: Histogram::new(exponential_buckets(1_000.0, 4.0, 12)),
            size: Gauge::default(),
        };
        let mut registry = Registry::default();
        metrics.register(registry.sub_registry_with_prefix("mempool"));
        (metrics, registry)
    }

    /// Registers all mempool metrics into `registry`.
    pub fn register(&self, registry: &mut Registry) {
        registry.register("add", "Time spent adding items (ns)", self.add.clone());
        registry.register(
            "build_overhead",
            "Time spent handling mempool build, excluding builder callback time (ns)",
            self.build_overhead.clone(),
        );
        registry.register(
            "set_min_timestamp",
            "Time spent setting the minimum timestamp (ns)",
            self.set_min_timestamp.clone(),
        );
        registry.register(
            "size",
            "Number of items currently in the mempool",
            self.size.clone(),
        );
    }
}
