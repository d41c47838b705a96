//! Route queries built on the engine: a single guarded route, a
//! comparison across criteria, and every route from one origin.

use std::fmt;

use serde::Serialize;

use crate::types::{
    criterion::Criterion,
    error::{Result, RouterError},
    metrics::PathMetrics,
    network::Network,
};

use super::path::{path_metrics, reconstruct, Path};

/// A reachable route and everything reported about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub criterion: Criterion,
    pub path: Path,
    /// Accumulated weight under `criterion`.
    pub weight: f64,
    /// Raw totals; [`None`] only when origin and destination coincide.
    pub metrics: Option<PathMetrics>,
}

impl Route {
    pub fn origin(&self) -> &str {
        &self.path[0]
    }

    pub fn destination(&self) -> &str {
        &self.path[self.path.len() - 1]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join(" → "))
    }
}

/// Result of one query in a batch: either a route or no connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RouteOutcome {
    Found(Route),
    Unreachable {
        criterion: Criterion,
        destination: String,
    },
}

/// Finds the best route from `origin` to `destination`.
///
/// # Errors
/// * [`RouterError::UnknownCity`] if either city is not in the network.
/// * [`RouterError::Unreachable`] if no path exists.
/// * [`RouterError::WeightOverflow`] if a distance leaves the `f64` range.
pub fn route(
    network: &Network,
    origin: &str,
    destination: &str,
    criterion: Criterion,
) -> Result<Route> {
    if !network.contains(destination) {
        return Err(RouterError::UnknownCity(destination.to_string()));
    }
    let (distances, predecessors) = network.shortest_paths(origin, criterion)?;

    let weight = distances[destination];
    if weight.is_infinite() {
        return Err(RouterError::Unreachable {
            origin: origin.to_string(),
            destination: destination.to_string(),
            criterion,
        });
    }

    let path = reconstruct(&predecessors, destination);
    let metrics = path_metrics(network, &path);
    debug!("Route {} ({}): {:?}", criterion, weight, path);
    Ok(Route {
        criterion,
        path,
        weight,
        metrics,
    })
}

/// Runs [`route`] once per criterion, in [`Criterion::ALL`] order.
///
/// # Errors
/// [`RouterError::UnknownCity`] for unknown endpoints. Unreachable
/// destinations are reported per criterion, not as errors.
pub fn compare_criteria(
    network: &Network,
    origin: &str,
    destination: &str,
) -> Result<Vec<RouteOutcome>> {
    Criterion::ALL
        .iter()
        .map(|&criterion| outcome(route(network, origin, destination, criterion)))
        .collect()
}

/// Routes from `origin` to every other city, in sorted city order.
///
/// One search serves all destinations.
pub fn routes_from(
    network: &Network,
    origin: &str,
    criterion: Criterion,
) -> Result<Vec<RouteOutcome>> {
    let (distances, predecessors) = network.shortest_paths(origin, criterion)?;

    let outcomes = network
        .cities()
        .iter()
        .filter(|city| city.as_str() != origin)
        .map(|city| {
            let weight = distances[city];
            if weight.is_infinite() {
                return RouteOutcome::Unreachable {
                    criterion,
                    destination: city.clone(),
                };
            }
            let path = reconstruct(&predecessors, city);
            let metrics = path_metrics(network, &path);
            RouteOutcome::Found(Route {
                criterion,
                path,
                weight,
                metrics,
            })
        })
        .collect();
    Ok(outcomes)
}

fn outcome(result: Result<Route>) -> Result<RouteOutcome> {
    match result {
        Ok(route) => Ok(RouteOutcome::Found(route)),
        Err(RouterError::Unreachable {
            criterion,
            destination,
            ..
        }) => Ok(RouteOutcome::Unreachable {
            criterion,
            destination,
        }),
        Err(err) => Err(err),
    }
}
