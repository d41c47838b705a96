//! Single-source shortest paths over a [`Network`].
//!
//! Classic Dijkstra with a binary min-heap. [`BinaryHeap`] has no
//! decrease-key, so an improved city is pushed again and stale entries
//! are skipped when popped.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use ordered_float::OrderedFloat;

use crate::types::{
    criterion::Criterion,
    error::{Result, RouterError},
    network::Network,
};
use crate::utils::weight::weight;

/// Minimal accumulated weight from the origin to every city.
/// Unreached cities map to [`f64::INFINITY`].
pub type DistanceMap = HashMap<String, f64>;

/// The city from which each reached city's distance was last improved.
/// The origin and unreached cities have no entry.
pub type PredecessorMap = HashMap<String, String>;

/// Computes least-weight distances from `origin` to every city.
///
/// # Arguments
/// * `network` - The graph store to search.
/// * `origin` - The city to start from.
/// * `criterion` - Selects the weight of every connection.
///
/// # Returns
/// The distance and predecessor maps of this single query. Nothing is
/// cached; repeated calls with the same arguments return equal maps.
///
/// Ties are broken in favor of the predecessor found first: a
/// candidate replaces a recorded distance only when strictly smaller.
///
/// # Errors
/// * [`RouterError::UnknownCity`] if `origin` is not in the network.
/// * [`RouterError::WeightOverflow`] if a reachable city's distance
///   exceeds `f64::MAX`; an infinite distance always means unreached.
///
/// # Time Complexity
/// *O*((*V* + *E*) log *V*).
pub fn shortest_paths(
    network: &Network,
    origin: &str,
    criterion: Criterion,
) -> Result<(DistanceMap, PredecessorMap)> {
    if !network.contains(origin) {
        return Err(RouterError::UnknownCity(origin.to_string()));
    }
    debug!("Searching from {} (criterion: {})", origin, criterion);

    let mut distances: DistanceMap = network
        .cities()
        .iter()
        .map(|city| (city.clone(), f64::INFINITY))
        .collect();
    let mut predecessors = PredecessorMap::new();
    let mut queue = BinaryHeap::new();
    let mut overflowed = HashSet::new();

    distances.insert(origin.to_string(), 0.0);
    queue.push(Reverse((OrderedFloat(0.0), origin)));

    while let Some(Reverse((OrderedFloat(current), city))) = queue.pop() {
        if current > distances[city] {
            continue;
        }

        for connection in network.connections_from(city)? {
            let candidate = current + weight(criterion, connection);
            let neighbor = connection.destination.as_str();
            if candidate.is_infinite() {
                overflowed.insert(neighbor);
                continue;
            }
            if candidate < distances[neighbor] {
                distances.insert(neighbor.to_string(), candidate);
                predecessors.insert(neighbor.to_string(), city.to_string());
                queue.push(Reverse((OrderedFloat(candidate), neighbor)));
            }
        }
    }

    // Reachable, but only through a sum past f64::MAX.
    if let Some(city) = network
        .cities()
        .iter()
        .find(|city| overflowed.contains(city.as_str()) && distances[*city].is_infinite())
    {
        return Err(RouterError::WeightOverflow {
            origin: origin.to_string(),
            city: city.clone(),
            criterion,
        });
    }

    debug!(
        "Reached {} of {} cities from {}",
        predecessors.len() + 1,
        network.city_count(),
        origin
    );
    Ok((distances, predecessors))
}
