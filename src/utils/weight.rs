//! Edge weighting for each [`Criterion`].
//!
//! The engine never looks at raw metrics directly; it asks [`weight`]
//! for a scalar derived from the query's criterion.

use crate::types::{connection::Connection, criterion::Criterion};

/// Bandwidth is inverted against this ceiling so that wider links get
/// smaller weights. Links above it are rejected at load time.
pub const BANDWIDTH_CEILING: f64 = 1000.0;

/// Scales cost per megabyte into the magnitude of latency values.
pub const COST_SCALE: f64 = 100.0;

/// Composite blend factors for latency, cost and inverted bandwidth.
pub const COMPOSITE_LATENCY_FACTOR: f64 = 0.5;
pub const COMPOSITE_COST_FACTOR: f64 = 50.0;
pub const COMPOSITE_BANDWIDTH_FACTOR: f64 = 0.3;

/// Computes the weight of a connection under `criterion`.
///
/// # Arguments
/// * `criterion` - The optimization objective of the query.
/// * `connection` - The connection being relaxed.
///
/// # Returns
/// A non-negative weight. Non-negativity holds because
/// [`LinkMetrics`](crate::types::connection::LinkMetrics) keeps latency
/// and cost at or above zero and bandwidth at or below
/// [`BANDWIDTH_CEILING`].
pub fn weight(criterion: Criterion, connection: &Connection) -> f64 {
    let metrics = &connection.metrics;
    match criterion {
        Criterion::Latency => metrics.latency_ms(),
        Criterion::Cost => metrics.cost_per_mb() * COST_SCALE,
        Criterion::Bandwidth => BANDWIDTH_CEILING - metrics.bandwidth_mbps(),
        Criterion::Composite => {
            metrics.latency_ms() * COMPOSITE_LATENCY_FACTOR
                + metrics.cost_per_mb() * COMPOSITE_COST_FACTOR
                + (BANDWIDTH_CEILING - metrics.bandwidth_mbps()) * COMPOSITE_BANDWIDTH_FACTOR
        }
    }
}
