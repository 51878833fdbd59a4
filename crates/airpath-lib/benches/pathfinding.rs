use airpath_lib::{
    compare_paths, find_fewest_stops, find_shortest_path, Direction, Graph, MemoryDirectory,
};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;

const GRID_SIDE: usize = 30;

fn code(row: usize, column: usize) -> String {
    format!("R{row:02}C{column:02}")
}

/// Grid of airports with a few long-haul shortcuts so the two engines disagree.
static GRID: Lazy<Graph> = Lazy::new(|| {
    let mut graph = Graph::new();
    for row in 0..GRID_SIDE {
        for column in 0..GRID_SIDE {
            let weight = 100 + ((row * 31 + column * 17) % 250) as u64;
            if column + 1 < GRID_SIDE {
                let to = code(row, column + 1);
                graph.add_edge(&code(row, column), &to, weight, weight / 8, Direction::Bidirectional);
            }
            if row + 1 < GRID_SIDE {
                let to = code(row + 1, column);
                graph.add_edge(&code(row, column), &to, weight, weight / 8, Direction::Bidirectional);
            }
        }
    }
    for step in (0..GRID_SIDE).step_by(5) {
        let far = GRID_SIDE - 1 - step;
        graph.add_edge(&code(step, 0), &code(far, far), 9_000, 600, Direction::Bidirectional);
    }
    graph
});

static DIRECTORY: Lazy<MemoryDirectory> = Lazy::new(|| {
    let mut directory = MemoryDirectory::new();
    for row in 0..GRID_SIDE {
        for column in 0..GRID_SIDE {
            let code = code(row, column);
            directory.add_airport(&code, &format!("Airport {code}"));
        }
    }
    for row in 0..GRID_SIDE {
        for column in 0..GRID_SIDE {
            if column + 1 < GRID_SIDE {
                directory.connect(&code(row, column), &code(row, column + 1), 120, 15);
            }
            if row + 1 < GRID_SIDE {
                directory.connect(&code(row, column), &code(row + 1, column), 140, 18);
            }
        }
    }
    directory
});

fn benchmark_pathfinding(c: &mut Criterion) {
    let graph = &*GRID;
    let origin = code(0, 0);
    let destination = code(GRID_SIDE - 1, GRID_SIDE - 1);

    c.bench_function("dijkstra_grid_corner_to_corner", |b| {
        b.iter(|| {
            let result = find_shortest_path(graph, &origin, &destination).expect("path exists");
            black_box(result.total_distance)
        });
    });

    c.bench_function("bfs_grid_corner_to_corner", |b| {
        b.iter(|| {
            let path = find_fewest_stops(graph, &origin, &destination).expect("path exists");
            black_box(path.len())
        });
    });

    c.bench_function("compare_paths_directory", |b| {
        let directory = &*DIRECTORY;
        b.iter(|| {
            let comparison =
                compare_paths(directory, &origin, &destination).expect("paths exist");
            black_box((comparison.dijkstra.stop_count, comparison.bfs.stop_count))
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
