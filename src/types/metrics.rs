//! Aggregates reported to users: per-route [`PathMetrics`] and
//! whole-network [`NetworkStats`].

use serde::Serialize;

/// Raw totals along a path.
///
/// Always computed from the raw link metrics, never from the weights
/// that selected the path, so `cost_total` differs from the weighted
/// distance under every criterion but `cost` (and even there by the
/// cost scale factor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathMetrics {
    /// Sum of link latencies, in milliseconds.
    pub latency_total: f64,
    /// Sum of link costs per megabyte.
    pub cost_total: f64,
    /// Smallest link bandwidth on the path, in Mbps.
    pub bottleneck_bandwidth: f64,
    /// Number of links traversed.
    pub hops: usize,
}

/// Connectivity summary of a loaded network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStats {
    pub city_count: usize,
    pub connection_count: usize,
    /// The city with the most outgoing connections and that count.
    /// Ties go to the lexicographically first city.
    pub most_connected: Option<(String, usize)>,
    /// Outgoing connection count per city, sorted by city.
    pub degrees: Vec<(String, usize)>,
}
