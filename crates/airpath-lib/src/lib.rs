//! airpath library entry points.
//!
//! This crate builds weighted route graphs from persisted airports and routes,
//! runs shortest-distance (Dijkstra) and fewest-stops (breadth-first) searches,
//! and packages the results for callers. Higher-level consumers (CLI, HTTP
//! service) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod db;
pub mod error;
pub mod export;
pub mod graph;
pub mod path;
pub mod routing;
pub mod store;

pub use db::{NewAirport, NewRoute, SqliteDirectory};
pub use error::{Error, Result};
pub use export::{export_graph, GraphExport, GraphStatistics};
pub use graph::{build_route_graph, canonical_code, Direction, Edge, Graph, RouteGraph};
pub use path::{
    dijkstra, find_fewest_stops, find_fewest_stops_result, find_path_depth_first,
    find_shortest_path, path_metrics, reconstruct_path, traverse_depth_first, PathMetrics,
    PathResult, ShortestPathTree,
};
pub use routing::{
    compare_paths, plan_path, resolve_airport, PathAlgorithm, PathComparison, PathFailure,
    PathRequest, PathResponse, PathStop,
};
pub use store::{ActiveRoute, Airport, AirportDirectory, AirportId, MemoryDirectory};
