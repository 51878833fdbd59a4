use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::graph::{canonical_code, Graph};

/// Path found by one of the search engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    /// Ordered vertices from origin to destination, both inclusive.
    pub path: Vec<String>,
    /// Sum of edge weights (km) along `path`.
    pub total_distance: u64,
    /// Sum of edge times (minutes) along `path`.
    pub total_time: u64,
}

impl PathResult {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Distance and time accumulated over an explicit path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathMetrics {
    pub distance: u64,
    pub time: u64,
}

/// Output of a single-source Dijkstra run.
///
/// Only vertices reached by relaxation (plus the origin) carry a distance;
/// everything else is unreachable.
#[derive(Debug, Clone, Default)]
pub struct ShortestPathTree {
    origin: String,
    distances: HashMap<String, u64>,
    predecessors: HashMap<String, String>,
    times: HashMap<String, u64>,
}

impl ShortestPathTree {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Shortest distance to `vertex`, or `None` when unreachable.
    pub fn distance(&self, vertex: &str) -> Option<u64> {
        self.distances.get(&canonical_code(vertex)).copied()
    }

    /// Time accumulated along the shortest path; zero when unreachable.
    pub fn time(&self, vertex: &str) -> u64 {
        self.times
            .get(&canonical_code(vertex))
            .copied()
            .unwrap_or(0)
    }

    pub fn predecessor(&self, vertex: &str) -> Option<&str> {
        self.predecessors
            .get(&canonical_code(vertex))
            .map(String::as_str)
    }

    pub fn is_reachable(&self, vertex: &str) -> bool {
        self.distance(vertex).is_some()
    }

    pub fn predecessors(&self) -> &HashMap<String, String> {
        &self.predecessors
    }

    /// Walk predecessor links back from `destination`. See
    /// [`reconstruct_path`] for the single-element caveat.
    pub fn path_to(&self, destination: &str) -> Vec<String> {
        reconstruct_path(&self.predecessors, destination)
    }
}

/// Run Dijkstra's algorithm from `origin` over the whole graph.
pub fn dijkstra(graph: &Graph, origin: &str) -> ShortestPathTree {
    let origin = canonical_code(origin);
    let mut tree = ShortestPathTree {
        origin: origin.clone(),
        ..ShortestPathTree::default()
    };
    let mut queue = BinaryHeap::new();

    tree.distances.insert(origin.clone(), 0);
    tree.times.insert(origin.clone(), 0);
    queue.push(QueueEntry::new(origin, 0));

    while let Some(QueueEntry { node, cost }) = queue.pop() {
        // Stale entry: a strictly better distance was recorded after the push.
        let current = match tree.distances.get(&node) {
            Some(&distance) if distance < cost => continue,
            Some(&distance) => distance,
            None => continue,
        };
        let current_time = tree.times.get(&node).copied().unwrap_or(0);

        for edge in graph.neighbours(&node) {
            // Saturated costs stay reachable but never beat a real sum.
            let next_cost = current.saturating_add(edge.weight);
            let improves = tree
                .distances
                .get(&edge.destination)
                .map_or(true, |&known| next_cost < known);
            if improves {
                tree.distances.insert(edge.destination.clone(), next_cost);
                tree.predecessors
                    .insert(edge.destination.clone(), node.clone());
                tree.times
                    .insert(edge.destination.clone(), current_time.saturating_add(edge.time));
                queue.push(QueueEntry::new(edge.destination.clone(), next_cost));
            }
        }
    }

    tree
}

/// Rebuild the origin→destination path from predecessor links.
///
/// A destination with no predecessor yields `[destination]`, which is only a
/// real path when it is also the origin; check reachability first.
pub fn reconstruct_path(predecessors: &HashMap<String, String>, destination: &str) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = Some(canonical_code(destination));
    while let Some(node) = current {
        current = predecessors.get(&node).cloned();
        path.push(node);
    }
    path.reverse();
    path
}

/// Lowest-distance path between two vertices, or `None` when either endpoint
/// is missing from the graph or the destination is unreachable.
pub fn find_shortest_path(graph: &Graph, origin: &str, destination: &str) -> Option<PathResult> {
    if !graph.has_vertex(origin) || !graph.has_vertex(destination) {
        return None;
    }

    let tree = dijkstra(graph, origin);
    let total_distance = tree.distance(destination)?;
    let path = tree.path_to(destination);
    debug!(
        origin = tree.origin(),
        destination,
        total_distance,
        hops = path.len().saturating_sub(1),
        "dijkstra search complete"
    );

    Some(PathResult {
        path,
        total_distance,
        total_time: tree.time(destination),
    })
}

/// Breadth-first search for the path with the fewest hops.
///
/// Neighbours are expanded in edge insertion order and the first path that
/// reaches `destination` wins, so ties between equal-length paths go to the
/// earliest-inserted edges rather than the lightest.
pub fn find_fewest_stops(graph: &Graph, origin: &str, destination: &str) -> Option<Vec<String>> {
    if !graph.has_vertex(origin) || !graph.has_vertex(destination) {
        return None;
    }

    let origin = canonical_code(origin);
    let destination = canonical_code(destination);
    if origin == destination {
        return Some(vec![origin]);
    }

    let mut visited: HashSet<String> = HashSet::from([origin.clone()]);
    let mut queue = VecDeque::from([(origin.clone(), vec![origin])]);

    while let Some((current, path)) = queue.pop_front() {
        for edge in graph.neighbours(&current) {
            let next = &edge.destination;
            if visited.contains(next) {
                continue;
            }

            let mut extended = path.clone();
            extended.push(next.clone());
            if *next == destination {
                return Some(extended);
            }

            visited.insert(next.clone());
            queue.push_back((next.clone(), extended));
        }
    }

    None
}

/// Recompute distance and time for an explicit path.
///
/// For each consecutive pair the first matching outgoing edge is used; a pair
/// with no edge contributes nothing. Paths shorter than two vertices yield
/// zero. Totals saturate at `u64::MAX`.
pub fn path_metrics(graph: &Graph, path: &[String]) -> PathMetrics {
    let mut metrics = PathMetrics::default();
    for pair in path.windows(2) {
        let target = canonical_code(&pair[1]);
        if let Some(edge) = graph
            .neighbours(&pair[0])
            .iter()
            .find(|edge| edge.destination == target)
        {
            metrics.distance = metrics.distance.saturating_add(edge.weight);
            metrics.time = metrics.time.saturating_add(edge.time);
        }
    }
    metrics
}

/// Fewest-stops search packaged with its recomputed metrics.
pub fn find_fewest_stops_result(
    graph: &Graph,
    origin: &str,
    destination: &str,
) -> Option<PathResult> {
    let path = find_fewest_stops(graph, origin, destination)?;
    let metrics = path_metrics(graph, &path);
    debug!(
        origin,
        destination,
        hops = path.len().saturating_sub(1),
        "breadth-first search complete"
    );

    Some(PathResult {
        path,
        total_distance: metrics.distance,
        total_time: metrics.time,
    })
}

/// Depth-first pre-order visitation from `origin`.
///
/// Uses an explicit stack of edge cursors so deep graphs cannot overflow the
/// call stack; the visiting order matches a recursive traversal that follows
/// edges in insertion order.
pub fn traverse_depth_first(graph: &Graph, origin: &str) -> Vec<String> {
    let origin = canonical_code(origin);
    if !graph.has_vertex(&origin) {
        return Vec::new();
    }

    let mut visited = HashSet::from([origin.clone()]);
    let mut order = vec![origin.clone()];
    let mut stack: Vec<(String, usize)> = vec![(origin, 0)];

    while let Some((vertex, cursor)) = stack.last_mut() {
        let edges = graph.neighbours(vertex);
        let Some(edge) = edges.get(*cursor) else {
            stack.pop();
            continue;
        };
        *cursor += 1;

        if visited.insert(edge.destination.clone()) {
            order.push(edge.destination.clone());
            stack.push((edge.destination.clone(), 0));
        }
    }

    order
}

/// First path found by depth-first search, with backtracking.
pub fn find_path_depth_first(
    graph: &Graph,
    origin: &str,
    destination: &str,
) -> Option<Vec<String>> {
    if !graph.has_vertex(origin) || !graph.has_vertex(destination) {
        return None;
    }

    let origin = canonical_code(origin);
    let destination = canonical_code(destination);
    if origin == destination {
        return Some(vec![origin]);
    }

    let mut visited = HashSet::from([origin.clone()]);
    let mut path = vec![origin];
    let mut cursors = vec![0usize];

    while let Some(cursor) = cursors.last_mut() {
        let Some(current) = path.last() else {
            break;
        };
        let Some(edge) = graph.neighbours(current).get(*cursor) else {
            cursors.pop();
            path.pop();
            continue;
        };
        *cursor += 1;

        if visited.insert(edge.destination.clone()) {
            path.push(edge.destination.clone());
            if edge.destination == destination {
                return Some(path);
            }
            cursors.push(0);
        }
    }

    None
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: String,
    cost: u64,
}

impl QueueEntry {
    fn new(node: String, cost: u64) -> Self {
        Self { node, cost }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Direction;

    fn chain() -> Graph {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", 1, 1, Direction::Bidirectional);
        graph.add_edge("B", "C", 1, 1, Direction::Bidirectional);
        graph.add_edge("A", "D", 1, 1, Direction::Bidirectional);
        graph
    }

    #[test]
    fn queue_pops_lowest_cost_first() {
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry::new("B".to_string(), 7));
        heap.push(QueueEntry::new("A".to_string(), 3));
        heap.push(QueueEntry::new("C".to_string(), 5));
        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|e| e.cost)).collect();
        assert_eq!(order, vec![3, 5, 7]);
    }

    #[test]
    fn reconstruct_path_of_unreached_vertex_is_single_element() {
        let predecessors = HashMap::new();
        assert_eq!(reconstruct_path(&predecessors, "zzz"), vec!["ZZZ"]);
    }

    #[test]
    fn depth_first_follows_insertion_order() {
        let graph = chain();
        assert_eq!(traverse_depth_first(&graph, "A"), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn depth_first_from_unknown_vertex_is_empty() {
        assert!(traverse_depth_first(&chain(), "Q").is_empty());
    }

    #[test]
    fn depth_first_path_backtracks() {
        let graph = chain();
        assert_eq!(
            find_path_depth_first(&graph, "A", "D"),
            Some(vec!["A".to_string(), "D".to_string()])
        );
        assert_eq!(
            find_path_depth_first(&graph, "C", "D"),
            Some(vec![
                "C".to_string(),
                "B".to_string(),
                "A".to_string(),
                "D".to_string()
            ])
        );
    }

    #[test]
    fn lowercase_arguments_match_canonical_vertices() {
        let graph = chain();
        let result = find_shortest_path(&graph, "a", "c").expect("path exists");
        assert_eq!(result.path, vec!["A", "B", "C"]);
        assert_eq!(find_fewest_stops(&graph, "c", "a").map(|p| p.len()), Some(3));
    }
}
