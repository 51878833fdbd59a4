use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::store::ActiveRoute;

/// Normalise an airport identifier into the canonical vertex form used inside
/// the graph (trimmed, ASCII uppercase).
pub fn canonical_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Whether an edge is mirrored in the opposite direction when added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Bidirectional,
    OneWay,
}

/// Directed edge within the route graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub destination: String,
    /// Distance in kilometres.
    pub weight: u64,
    /// Flight time in minutes.
    pub time: u64,
}

/// Adjacency-list graph keyed by canonical airport code.
///
/// Parallel edges are kept as-is: two source rows between the same pair of
/// airports produce two independent entries.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<String, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vertex with an empty edge list. Re-adding is a no-op.
    pub fn add_vertex(&mut self, vertex: &str) {
        self.adjacency.entry(canonical_code(vertex)).or_default();
    }

    /// Append an edge from `origin` to `destination`, registering both
    /// endpoints. Weight sign is not checked here.
    pub fn add_edge(
        &mut self,
        origin: &str,
        destination: &str,
        weight: u64,
        time: u64,
        direction: Direction,
    ) {
        let origin = canonical_code(origin);
        let destination = canonical_code(destination);

        self.adjacency
            .entry(origin.clone())
            .or_default()
            .push(Edge {
                destination: destination.clone(),
                weight,
                time,
            });

        let reverse = self.adjacency.entry(destination).or_default();
        if direction == Direction::Bidirectional {
            reverse.push(Edge {
                destination: origin,
                weight,
                time,
            });
        }
    }

    /// Return the outgoing edges for `vertex`, or an empty slice when the
    /// vertex is unknown.
    pub fn neighbours(&self, vertex: &str) -> &[Edge] {
        self.adjacency
            .get(&canonical_code(vertex))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Set of every known vertex.
    pub fn vertices(&self) -> HashSet<&str> {
        self.adjacency.keys().map(String::as_str).collect()
    }

    pub fn has_vertex(&self, vertex: &str) -> bool {
        self.adjacency.contains_key(&canonical_code(vertex))
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edge entries (a bidirectional route counts twice).
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<&String> = self.adjacency.keys().collect();
        codes.sort();
        for (index, code) in codes.into_iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let edges = self.adjacency[code]
                .iter()
                .map(|edge| format!("{} ({} km)", edge.destination, edge.weight))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "{code} -> [{edges}]")?;
        }
        Ok(())
    }
}

/// Graph built from persisted routes together with the display names
/// collected while scanning them.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    pub graph: Graph,
    pub names: HashMap<String, String>,
}

impl RouteGraph {
    /// Display name for a canonical code, if any route referenced it.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(&canonical_code(code)).map(String::as_str)
    }
}

/// Build a bidirectional route graph from active route rows.
///
/// Rows with a non-positive distance are skipped so the graph never carries
/// weights that would break shortest-path search.
pub fn build_route_graph(routes: &[ActiveRoute]) -> RouteGraph {
    let mut graph = Graph::new();
    let mut names = HashMap::new();
    let mut skipped_routes = 0usize;

    for route in routes {
        let origin = canonical_code(&route.origin_code);
        let destination = canonical_code(&route.destination_code);
        names.insert(origin.clone(), route.origin_name.clone());
        names.insert(destination.clone(), route.destination_name.clone());

        let weight = match u64::try_from(route.distance_km) {
            Ok(weight) if weight > 0 => weight,
            _ => {
                skipped_routes += 1;
                continue;
            }
        };
        let time = route
            .time_min
            .and_then(|minutes| u64::try_from(minutes).ok())
            .unwrap_or(0);

        graph.add_edge(&origin, &destination, weight, time, Direction::Bidirectional);
    }

    if skipped_routes > 0 {
        warn!(skipped_routes, "ignored routes with non-positive distance");
    }

    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "built route graph"
    );

    RouteGraph { graph, names }
}
