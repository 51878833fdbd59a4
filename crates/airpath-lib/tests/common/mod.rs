//! Shared fixtures for integration tests.

#![allow(dead_code)]

use airpath_lib::{Direction, Graph, MemoryDirectory};

/// GRU/GIG/REC triangle where the direct GRU–REC edge is the shortest.
pub fn brazil_graph() -> Graph {
    let mut graph = Graph::new();
    graph.add_edge("GRU", "REC", 2125, 180, Direction::Bidirectional);
    graph.add_edge("GRU", "GIG", 357, 55, Direction::Bidirectional);
    graph.add_edge("GIG", "REC", 1830, 150, Direction::Bidirectional);
    graph
}

/// Triangle plus a cheap two-hop detour through X.
pub fn detour_graph() -> Graph {
    let mut graph = brazil_graph();
    graph.add_edge("GRU", "X", 10, 5, Direction::Bidirectional);
    graph.add_edge("X", "REC", 10, 5, Direction::Bidirectional);
    graph
}

/// Directory matching [`brazil_graph`] plus an isolated airport (CNF).
pub fn brazil_directory() -> MemoryDirectory {
    let mut directory = MemoryDirectory::new();
    directory.add_airport("GRU", "Sao Paulo/Guarulhos");
    directory.add_airport("GIG", "Rio de Janeiro/Galeao");
    directory.add_airport("REC", "Recife/Guararapes");
    directory.add_airport("CNF", "Belo Horizonte/Confins");
    directory.connect("GRU", "REC", 2125, 180);
    directory.connect("GRU", "GIG", 357, 55);
    directory.connect("GIG", "REC", 1830, 150);
    directory
}

/// Every simple path from `origin` to `destination`, for brute-force checks.
pub fn all_simple_paths(graph: &Graph, origin: &str, destination: &str) -> Vec<Vec<String>> {
    let mut found = Vec::new();
    let mut path = vec![origin.to_string()];
    extend_paths(graph, destination, &mut path, &mut found);
    found
}

fn extend_paths(
    graph: &Graph,
    destination: &str,
    path: &mut Vec<String>,
    found: &mut Vec<Vec<String>>,
) {
    let current = path.last().cloned().unwrap_or_default();
    if current == destination {
        found.push(path.clone());
        return;
    }
    for edge in graph.neighbours(&current) {
        if path.contains(&edge.destination) {
            continue;
        }
        path.push(edge.destination.clone());
        extend_paths(graph, destination, path, found);
        path.pop();
    }
}

/// Smallest total weight over a path, trying every parallel edge per hop.
pub fn min_weight(graph: &Graph, path: &[String]) -> u64 {
    path.windows(2)
        .map(|pair| {
            graph
                .neighbours(&pair[0])
                .iter()
                .filter(|edge| edge.destination == pair[1])
                .map(|edge| edge.weight)
                .min()
                .unwrap_or(u64::MAX)
        })
        .sum()
}

/// Small deterministic graphs with strictly positive weights.
pub fn sample_graphs() -> Vec<Graph> {
    let mut graphs = vec![brazil_graph(), detour_graph()];

    let mut grid = Graph::new();
    let nodes = ["A", "B", "C", "D", "E", "F"];
    let mut seed = 7u64;
    for (i, from) in nodes.iter().enumerate() {
        for to in nodes.iter().skip(i + 1) {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            if seed % 3 == 0 {
                continue;
            }
            let weight = 1 + (seed >> 33) % 50;
            grid.add_edge(from, to, weight, weight / 2, Direction::Bidirectional);
        }
    }
    graphs.push(grid);

    let mut one_way = Graph::new();
    one_way.add_edge("A", "B", 4, 1, Direction::OneWay);
    one_way.add_edge("B", "C", 4, 1, Direction::OneWay);
    one_way.add_edge("A", "C", 10, 1, Direction::OneWay);
    one_way.add_edge("C", "D", 1, 1, Direction::OneWay);
    one_way.add_edge("A", "C", 7, 2, Direction::OneWay);
    graphs.push(one_way);

    graphs
}
