//! ISP Backbone Routing Library.
//! Loads a backbone of cities and links, finds least-cost routes under
//! several criteria, renders the network and serves the renders.

#[macro_use]
extern crate log;

pub mod config;
pub mod gallery;
pub mod menu;

pub mod types {
    pub mod connection;
    pub mod criterion;
    pub mod error;
    pub mod metrics;
    pub mod network;
}

pub mod algorithms {
    pub mod dijkstra;
    pub mod path;
    pub mod report;
}

pub mod utils {
    pub mod loader;
    pub mod render;
    pub mod weight;
}

pub use algorithms::dijkstra::{shortest_paths, DistanceMap, PredecessorMap};
pub use algorithms::path::{path_metrics, reconstruct, Path};
pub use algorithms::report::{compare_criteria, route, routes_from, Route, RouteOutcome};
pub use types::connection::{Connection, EdgeRecord, LinkMetrics};
pub use types::criterion::Criterion;
pub use types::error::{Result, RouterError};
pub use types::metrics::{NetworkStats, PathMetrics};
pub use types::network::Network;
pub use utils::loader::{load_network, HeaderPolicy};
pub use utils::weight::{weight, BANDWIDTH_CEILING};
