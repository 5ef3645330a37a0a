//! Delivery route planner (nearest-neighbour heuristic).
//!
//! The heuristic is greedy: it repeatedly extends the route to the closest
//! unvisited stop. Deterministic for identical input order and start index,
//! with no optimality guarantee.

use thiserror::Error;
use tracing::debug;

use crate::haversine::{distance_matrix, haversine_km};
use crate::stop::Stop;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("start_index {index} out of range [0, {len})")]
    StartIndexOutOfRange { index: usize, len: usize },
}

/// A planned route: stops in visiting order plus the estimated length of
/// the geocoded segment.
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    pub stops: Vec<Stop>,
    /// Total great-circle distance over the geocoded segment. Ungeocoded
    /// stops contribute nothing.
    pub total_distance_km: f64,
}

/// Order a set of locations with the nearest-neighbour heuristic.
///
/// Returns the visiting order as indices into `locations`, starting from
/// `start_index`. Every index appears exactly once. Ties on distance go to
/// the lowest index (strict `<` scan in ascending index order).
pub fn nearest_neighbour_order(
    locations: &[(f64, f64)],
    start_index: usize,
) -> Result<Vec<usize>, PlanError> {
    if locations.is_empty() {
        return Ok(Vec::new());
    }

    let n = locations.len();
    if start_index >= n {
        return Err(PlanError::StartIndexOutOfRange {
            index: start_index,
            len: n,
        });
    }

    let matrix = distance_matrix(locations);
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    visited[start_index] = true;
    order.push(start_index);

    for _ in 1..n {
        let current = order[order.len() - 1];
        let mut best_dist = f64::INFINITY;
        let mut best_idx = None;

        for j in 0..n {
            if !visited[j] && matrix[current][j] < best_dist {
                best_dist = matrix[current][j];
                best_idx = Some(j);
            }
        }

        let Some(next) = best_idx else { break };
        visited[next] = true;
        order.push(next);
    }

    Ok(order)
}

/// Total distance in km for an ordered sequence of stops.
///
/// Sums consecutive geocoded pairs; sequences of length 0 or 1 are 0.
pub fn total_route_distance(stops: &[Stop]) -> f64 {
    let locations: Vec<(f64, f64)> = stops.iter().filter_map(Stop::location).collect();
    locations
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum()
}

/// Plan a delivery route over a mixed set of stops.
///
/// Stops without coordinates cannot take part in distance math, so the
/// input is partitioned first: the geocoded subset is ordered by the
/// heuristic and the ungeocoded remainder is appended afterwards in its
/// original relative order. Missing coordinates are never substituted with
/// a default; that would route through (0, 0).
///
/// `start_index` indexes the geocoded subset; `None` starts from the first
/// geocoded stop. With no geocoded stops the route is just the ungeocoded
/// input and the total is 0, regardless of `start_index`.
pub fn plan_route(stops: &[Stop], start_index: Option<usize>) -> Result<PlannedRoute, PlanError> {
    let mut geocoded: Vec<Stop> = Vec::new();
    let mut ungeocoded: Vec<Stop> = Vec::new();
    for stop in stops {
        if stop.is_geocoded() {
            geocoded.push(stop.clone());
        } else {
            ungeocoded.push(stop.clone());
        }
    }

    let (mut ordered, total_km) = if geocoded.is_empty() {
        (Vec::new(), 0.0)
    } else {
        let locations: Vec<(f64, f64)> = geocoded.iter().filter_map(Stop::location).collect();
        let order = nearest_neighbour_order(&locations, start_index.unwrap_or(0))?;
        let ordered: Vec<Stop> = order.into_iter().map(|i| geocoded[i].clone()).collect();
        let total_km = total_route_distance(&ordered);
        (ordered, total_km)
    };

    debug!(
        geocoded = ordered.len(),
        ungeocoded = ungeocoded.len(),
        total_km,
        "planned delivery route"
    );

    ordered.append(&mut ungeocoded);
    Ok(PlannedRoute {
        stops: ordered,
        total_distance_km: total_km,
    })
}
