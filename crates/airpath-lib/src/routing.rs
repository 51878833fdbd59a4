use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{build_route_graph, canonical_code, RouteGraph};
use crate::path::{find_fewest_stops_result, find_shortest_path, PathResult};
use crate::store::{Airport, AirportDirectory, AirportId};

/// Similarity threshold for "did you mean" suggestions.
const SUGGESTION_THRESHOLD: f64 = 0.7;
const MAX_SUGGESTIONS: usize = 3;

/// Supported path algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathAlgorithm {
    /// Lowest total distance.
    #[default]
    Dijkstra,
    /// Fewest stops; distance and time are informational.
    Bfs,
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PathAlgorithm::Dijkstra => "dijkstra",
            PathAlgorithm::Bfs => "bfs",
        };
        f.write_str(value)
    }
}

/// High-level path request. Identifiers are airport codes or numeric ids.
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub origin: String,
    pub destination: String,
    pub algorithm: PathAlgorithm,
}

impl PathRequest {
    pub fn dijkstra(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            algorithm: PathAlgorithm::Dijkstra,
        }
    }

    pub fn bfs(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            algorithm: PathAlgorithm::Bfs,
        }
    }
}

/// One airport along a returned path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStop {
    pub code: String,
    pub name: String,
    pub order: usize,
}

/// Successful path computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResponse {
    pub algorithm: PathAlgorithm,
    pub origin_code: String,
    pub destination_code: String,
    pub path: Vec<PathStop>,
    pub total_distance_km: u64,
    pub total_time_min: u64,
    pub stop_count: usize,
}

impl PathResponse {
    /// Codes along the path, in order.
    pub fn codes(&self) -> Vec<&str> {
        self.path.iter().map(|stop| stop.code.as_str()).collect()
    }
}

/// Both engines run over the same graph snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathComparison {
    pub dijkstra: PathResponse,
    pub bfs: PathResponse,
}

/// Failure shape handed to result consumers. The HTTP service uses its
/// `message` as the problem `detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFailure {
    pub message: String,
}

impl From<&Error> for PathFailure {
    fn from(error: &Error) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// Resolve an identifier to an active airport: all-digit strings are treated
/// as numeric ids, anything else as a case-insensitive code.
pub fn resolve_airport(
    directory: &dyn AirportDirectory,
    identifier: &str,
) -> Result<Option<Airport>> {
    let identifier = identifier.trim();
    let airport = if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
        match identifier.parse::<AirportId>() {
            Ok(id) => directory.airport_by_id(id)?,
            Err(_) => None,
        }
    } else {
        directory.airport_by_code(identifier)?
    };
    Ok(airport.filter(|airport| airport.active))
}

/// Compute a path using the requested algorithm.
pub fn plan_path(directory: &dyn AirportDirectory, request: &PathRequest) -> Result<PathResponse> {
    let (origin, destination) = resolve_endpoints(directory, &request.origin, &request.destination)?;
    let route_graph = build_route_graph(&directory.active_routes()?);
    run_algorithm(&route_graph, request.algorithm, &origin, &destination)
}

/// Run Dijkstra and breadth-first search between the same endpoints.
pub fn compare_paths(
    directory: &dyn AirportDirectory,
    origin: &str,
    destination: &str,
) -> Result<PathComparison> {
    let (origin, destination) = resolve_endpoints(directory, origin, destination)?;
    let route_graph = build_route_graph(&directory.active_routes()?);

    Ok(PathComparison {
        dijkstra: run_algorithm(&route_graph, PathAlgorithm::Dijkstra, &origin, &destination)?,
        bfs: run_algorithm(&route_graph, PathAlgorithm::Bfs, &origin, &destination)?,
    })
}

fn resolve_endpoints(
    directory: &dyn AirportDirectory,
    origin: &str,
    destination: &str,
) -> Result<(String, String)> {
    let Some(origin_airport) = resolve_airport(directory, origin)? else {
        return Err(Error::UnknownOrigin {
            identifier: origin.to_string(),
            suggestions: suggest_codes(directory, origin)?,
        });
    };
    let Some(destination_airport) = resolve_airport(directory, destination)? else {
        return Err(Error::UnknownDestination {
            identifier: destination.to_string(),
            suggestions: suggest_codes(directory, destination)?,
        });
    };

    debug!(
        origin = %origin_airport.code,
        destination = %destination_airport.code,
        "resolved path endpoints"
    );
    Ok((
        canonical_code(&origin_airport.code),
        canonical_code(&destination_airport.code),
    ))
}

fn run_algorithm(
    route_graph: &RouteGraph,
    algorithm: PathAlgorithm,
    origin: &str,
    destination: &str,
) -> Result<PathResponse> {
    let found = match algorithm {
        PathAlgorithm::Dijkstra => find_shortest_path(&route_graph.graph, origin, destination),
        PathAlgorithm::Bfs => find_fewest_stops_result(&route_graph.graph, origin, destination),
    };
    let Some(result) = found else {
        return Err(Error::NoPathFound {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });
    };

    let response = into_response(route_graph, algorithm, origin, destination, result);
    info!(
        algorithm = %algorithm,
        origin,
        destination,
        stops = response.stop_count,
        distance_km = response.total_distance_km,
        "path computed"
    );
    Ok(response)
}

fn into_response(
    route_graph: &RouteGraph,
    algorithm: PathAlgorithm,
    origin: &str,
    destination: &str,
    result: PathResult,
) -> PathResponse {
    let stop_count = result.hop_count();
    let path = result
        .path
        .into_iter()
        .enumerate()
        .map(|(order, code)| PathStop {
            name: route_graph.name(&code).unwrap_or(&code).to_string(),
            code,
            order,
        })
        .collect();

    PathResponse {
        algorithm,
        origin_code: origin.to_string(),
        destination_code: destination.to_string(),
        path,
        total_distance_km: result.total_distance,
        total_time_min: result.total_time,
        stop_count,
    }
}

fn suggest_codes(directory: &dyn AirportDirectory, identifier: &str) -> Result<Vec<String>> {
    let wanted = canonical_code(identifier);
    if wanted.is_empty() || wanted.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(Vec::new());
    }

    let mut scored: Vec<(f64, String)> = directory
        .airport_codes()?
        .into_iter()
        .map(|code| {
            let code = canonical_code(&code);
            (strsim::jaro_winkler(&wanted, &code), code)
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.truncate(MAX_SUGGESTIONS);

    Ok(scored.into_iter().map(|(_, code)| code).collect())
}
