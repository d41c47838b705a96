//! Path reconstruction from predecessor links, and raw metric totals
//! along a path.

use crate::types::{metrics::PathMetrics, network::Network};

use super::dijkstra::PredecessorMap;

/// Ordered cities from origin to destination, both inclusive.
pub type Path = Vec<String>;

/// Walks predecessor links back from `destination` and reverses them.
///
/// The walk stops at the first city without a predecessor, which is the
/// origin for any reached city. An unreached destination has no
/// predecessor either and yields `[destination]`, so callers must check
/// the distance map for reachability first.
///
/// # Time Complexity
/// *O*(*n*) in the path length.
pub fn reconstruct(predecessors: &PredecessorMap, destination: &str) -> Path {
    let mut path = vec![destination.to_string()];
    let mut current = destination;
    while let Some(previous) = predecessors.get(current) {
        path.push(previous.clone());
        current = previous;
    }
    path.reverse();
    path
}

/// Totals the raw metrics of consecutive links along `path`.
///
/// For each hop the first connection to the next city is used,
/// whichever criterion produced the path.
///
/// # Returns
/// [`None`] if the path has fewer than 2 cities, or if two consecutive
/// cities are not connected.
pub fn path_metrics(network: &Network, path: &[String]) -> Option<PathMetrics> {
    if path.len() < 2 {
        return None;
    }

    let mut metrics = PathMetrics {
        latency_total: 0.0,
        cost_total: 0.0,
        bottleneck_bandwidth: f64::INFINITY,
        hops: path.len() - 1,
    };
    for hop in path.windows(2) {
        let link = network
            .connections_from(&hop[0])
            .ok()?
            .iter()
            .find(|connection| connection.destination == hop[1]);
        let Some(link) = link else {
            debug!("No link between {} and {}", hop[0], hop[1]);
            return None;
        };
        metrics.latency_total += link.metrics.latency_ms();
        metrics.cost_total += link.metrics.cost_per_mb();
        metrics.bottleneck_bandwidth = metrics
            .bottleneck_bandwidth
            .min(link.metrics.bandwidth_mbps());
    }
    Some(metrics)
}

#[cfg(test)]
mod path_tests {
    use super::*;
    use crate::types::{connection::EdgeRecord, criterion::Criterion};

    fn record(a: &str, b: &str, latency: f64, cost: f64, bandwidth: f64) -> EdgeRecord {
        EdgeRecord::new(a, b, latency, cost, bandwidth).unwrap()
    }

    fn path(cities: &[&str]) -> Path {
        cities.iter().map(|city| city.to_string()).collect()
    }

    #[test]
    fn test_single_edge_route() {
        let network = Network::load(vec![record("A", "B", 5.0, 0.25, 100.0)]);
        let (_, predecessors) = network.shortest_paths("A", Criterion::Latency).unwrap();

        let route = reconstruct(&predecessors, "B");
        assert_eq!(route, path(&["A", "B"]));

        let metrics = path_metrics(&network, &route).unwrap();
        assert_eq!(metrics.latency_total, 5.0);
        assert_eq!(metrics.cost_total, 0.25);
        assert_eq!(metrics.bottleneck_bandwidth, 100.0);
        assert_eq!(metrics.hops, 1);
    }

    #[test]
    fn test_origin_reconstructs_to_itself() {
        let network = Network::load(vec![record("A", "B", 5.0, 0.25, 100.0)]);
        let (_, predecessors) = network.shortest_paths("A", Criterion::Latency).unwrap();
        assert_eq!(reconstruct(&predecessors, "A"), path(&["A"]));
        assert_eq!(path_metrics(&network, &path(&["A"])), None);
        assert_eq!(path_metrics(&network, &[]), None);
    }

    #[test]
    fn test_multi_hop_metrics_use_raw_values() {
        let network = Network::load(vec![
            record("A", "B", 3.0, 0.10, 900.0),
            record("B", "C", 4.0, 0.05, 250.0),
            record("C", "D", 2.0, 0.20, 600.0),
        ]);
        let (distances, predecessors) = network.shortest_paths("A", Criterion::Cost).unwrap();
        let route = reconstruct(&predecessors, "D");
        assert_eq!(route, path(&["A", "B", "C", "D"]));

        let metrics = path_metrics(&network, &route).unwrap();
        assert_eq!(metrics.latency_total, 9.0);
        assert!((metrics.cost_total - 0.35).abs() < 1e-9);
        assert_eq!(metrics.bottleneck_bandwidth, 250.0);
        assert_eq!(metrics.hops, 3);
        // the weighted distance is scaled, the reported cost is not
        assert!((distances["D"] - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_parallel_link_is_reported() {
        let network = Network::load(vec![
            record("A", "B", 9.0, 0.9, 100.0),
            record("A", "B", 1.0, 0.1, 500.0),
        ]);
        let metrics = path_metrics(&network, &path(&["A", "B"])).unwrap();
        assert_eq!(metrics.latency_total, 9.0);
        assert_eq!(metrics.bottleneck_bandwidth, 100.0);
    }

    #[test]
    fn test_broken_path_has_no_metrics() {
        let network = Network::load(vec![
            record("A", "B", 1.0, 0.1, 100.0),
            record("C", "D", 1.0, 0.1, 100.0),
        ]);
        assert_eq!(path_metrics(&network, &path(&["A", "C"])), None);
        assert_eq!(path_metrics(&network, &path(&["A", "Z"])), None);
        assert_eq!(path_metrics(&network, &path(&["Z", "A"])), None);
    }
}
