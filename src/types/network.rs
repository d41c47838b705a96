//! The core of the router library.
//!
//! [`Network`] is the graph store: an adjacency list from every city to
//! its ordered outgoing [`Connection`]s. It is built once by
//! [`Network::load`] and is read-only afterwards, so a single instance
//! can serve queries from several threads.

use std::collections::{BTreeSet, HashMap};

use super::connection::{Connection, EdgeRecord, LinkMetrics};
use super::criterion::Criterion;
use super::error::{Result, RouterError};
use super::metrics::NetworkStats;
use crate::algorithms::dijkstra::{self, DistanceMap, PredecessorMap};

/// A bidirectional backbone of cities.
///
/// For every loaded link A–B the store holds a connection A→B and a
/// connection B→A with identical metrics. Parallel links between the
/// same pair are all kept, in load order.
#[derive(Debug, Clone, Default)]
pub struct Network {
    routes: HashMap<String, Vec<Connection>>,
    cities: Vec<String>,
    link_count: usize,
}

impl Network {
    /// Builds a network from edge records.
    ///
    /// Records are validated when they are constructed, so loading
    /// itself cannot fail half-way; the loader in
    /// [`utils::loader`](crate::utils::loader) parses every row before
    /// calling this, which keeps a bad row from producing a partial
    /// graph.
    ///
    /// # Time Complexity
    /// *O*(*E* + *V* log *V*).
    pub fn load(records: impl IntoIterator<Item = EdgeRecord>) -> Network {
        let mut routes: HashMap<String, Vec<Connection>> = HashMap::new();
        let mut link_count = 0;

        for record in records {
            if record.origin == record.destination {
                warn!("Self-loop on {} kept as given", record.origin);
            }
            let EdgeRecord {
                origin,
                destination,
                metrics,
            } = record;

            routes
                .entry(origin.clone())
                .or_default()
                .push(Connection {
                    destination: destination.clone(),
                    metrics,
                });
            routes.entry(destination).or_default().push(Connection {
                destination: origin,
                metrics,
            });
            link_count += 1;
        }

        let mut cities: Vec<String> = routes.keys().cloned().collect();
        cities.sort();

        info!(
            "Network loaded: {} cities, {} connections",
            cities.len(),
            link_count
        );
        Network {
            routes,
            cities,
            link_count,
        }
    }

    /// Known cities in lexicographic order.
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Returns true if `city` was loaded.
    pub fn contains(&self, city: &str) -> bool {
        self.routes.contains_key(city)
    }

    /// Outgoing connections of `city`, in load order.
    ///
    /// # Errors
    /// [`RouterError::UnknownCity`] if `city` was never loaded.
    pub fn connections_from(&self, city: &str) -> Result<&[Connection]> {
        self.routes
            .get(city)
            .map(Vec::as_slice)
            .ok_or_else(|| RouterError::UnknownCity(city.to_string()))
    }

    /// Number of undirected links loaded. Parallel links each count.
    pub fn connection_count(&self) -> usize {
        self.link_count
    }

    /// Number of cities.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Number of outgoing connections of `city`, zero if unknown.
    pub fn degree(&self, city: &str) -> usize {
        self.routes.get(city).map_or(0, Vec::len)
    }

    /// Runs the shortest-path engine from `origin`.
    ///
    /// See [`dijkstra::shortest_paths`].
    pub fn shortest_paths(
        &self,
        origin: &str,
        criterion: Criterion,
    ) -> Result<(DistanceMap, PredecessorMap)> {
        dijkstra::shortest_paths(self, origin, criterion)
    }

    /// One entry per unordered city pair, keeping the first connection
    /// loaded between them.
    ///
    /// Pairs are visited in sorted city order, so the result is stable
    /// across runs.
    pub fn links(&self) -> Vec<(&str, &str, LinkMetrics)> {
        let mut seen = BTreeSet::new();
        let mut links = Vec::new();
        for city in &self.cities {
            for connection in &self.routes[city] {
                let pair = if *city <= connection.destination {
                    (city.as_str(), connection.destination.as_str())
                } else {
                    (connection.destination.as_str(), city.as_str())
                };
                if seen.insert(pair) {
                    links.push((pair.0, pair.1, connection.metrics));
                }
            }
        }
        links
    }

    /// Summarizes connectivity.
    pub fn stats(&self) -> NetworkStats {
        let degrees: Vec<(String, usize)> = self
            .cities
            .iter()
            .map(|city| (city.clone(), self.degree(city)))
            .collect();

        let mut most_connected: Option<(String, usize)> = None;
        for (city, degree) in &degrees {
            if most_connected.as_ref().map_or(true, |(_, best)| degree > best) {
                most_connected = Some((city.clone(), *degree));
            }
        }

        NetworkStats {
            city_count: self.city_count(),
            connection_count: self.connection_count(),
            most_connected,
            degrees,
        }
    }
}

#[cfg(test)]
mod network_tests {
    use super::*;

    fn record(a: &str, b: &str, latency: f64, cost: f64, bandwidth: f64) -> EdgeRecord {
        EdgeRecord::new(a, b, latency, cost, bandwidth).unwrap()
    }

    fn sample() -> Network {
        Network::load(vec![
            record("Lima", "Cusco", 12.0, 0.02, 400.0),
            record("Lima", "Arequipa", 9.0, 0.03, 600.0),
            record("Arequipa", "Cusco", 7.0, 0.01, 300.0),
            record("Lima", "Trujillo", 5.0, 0.01, 800.0),
        ])
    }

    #[test]
    fn test_connections_are_symmetric() {
        let network = sample();
        for (a, b, metrics) in network.links() {
            let forward = network.connections_from(a).unwrap();
            let backward = network.connections_from(b).unwrap();
            assert!(forward
                .iter()
                .any(|c| c.destination == b && c.metrics == metrics));
            assert!(backward
                .iter()
                .any(|c| c.destination == a && c.metrics == metrics));
        }
    }

    #[test]
    fn test_cities_are_sorted() {
        let network = sample();
        assert_eq!(
            network.cities(),
            &["Arequipa", "Cusco", "Lima", "Trujillo"]
        );
        assert_eq!(network.city_count(), 4);
    }

    #[test]
    fn test_connection_order_follows_load_order() {
        let network = sample();
        let destinations: Vec<&str> = network
            .connections_from("Lima")
            .unwrap()
            .iter()
            .map(|c| c.destination.as_str())
            .collect();
        assert_eq!(destinations, vec!["Cusco", "Arequipa", "Trujillo"]);
    }

    #[test]
    fn test_unknown_city() {
        let network = sample();
        assert!(matches!(
            network.connections_from("Puno"),
            Err(RouterError::UnknownCity(city)) if city == "Puno"
        ));
        assert!(!network.contains("Puno"));
        assert_eq!(network.degree("Puno"), 0);
    }

    #[test]
    fn test_parallel_links_are_kept_and_counted() {
        let network = Network::load(vec![
            record("A", "B", 1.0, 0.1, 100.0),
            record("B", "A", 2.0, 0.2, 200.0),
            record("B", "C", 3.0, 0.3, 300.0),
        ]);
        assert_eq!(network.connection_count(), 3);
        assert_eq!(network.connections_from("A").unwrap().len(), 2);
        assert_eq!(network.connections_from("B").unwrap().len(), 3);

        // display keeps one link per pair, the first one loaded
        let links = network.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].0, "A");
        assert_eq!(links[0].1, "B");
        assert_eq!(links[0].2.latency_ms(), 1.0);
    }

    #[test]
    fn test_empty_network() {
        let network = Network::load(Vec::new());
        assert_eq!(network.city_count(), 0);
        assert_eq!(network.connection_count(), 0);
        assert_eq!(network.stats().most_connected, None);
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.city_count, 4);
        assert_eq!(stats.connection_count, 4);
        assert_eq!(stats.most_connected, Some(("Lima".to_string(), 3)));
        assert_eq!(
            stats.degrees,
            vec![
                ("Arequipa".to_string(), 2),
                ("Cusco".to_string(), 2),
                ("Lima".to_string(), 3),
                ("Trujillo".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_stats_tie_goes_to_first_city() {
        let network = Network::load(vec![record("B", "A", 1.0, 0.0, 10.0)]);
        assert_eq!(network.stats().most_connected, Some(("A".to_string(), 1)));
    }
}
