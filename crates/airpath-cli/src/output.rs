//! Plain-text rendering of path results.

use std::fmt::Write;

use airpath_lib::{GraphStatistics, PathAlgorithm, PathComparison, PathResponse};

/// Group digits in threes: `2125` becomes `2,125`.
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn heading(algorithm: PathAlgorithm) -> &'static str {
    match algorithm {
        PathAlgorithm::Dijkstra => "Shortest path",
        PathAlgorithm::Bfs => "Fewest stops",
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Multi-line listing of every stop plus totals.
///
/// ```text
/// Shortest path (dijkstra): GRU -> REC
///   0. GRU  Sao Paulo/Guarulhos
///   1. REC  Recife/Guararapes
/// Stops: 1
/// Total distance: 2,125 km
/// Total time: 180 min
/// ```
pub fn render_path(response: &PathResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}): {} -> {}",
        heading(response.algorithm),
        response.algorithm,
        response.origin_code,
        response.destination_code
    );
    for stop in &response.path {
        let _ = writeln!(out, "  {}. {}  {}", stop.order, stop.code, stop.name);
    }
    let _ = writeln!(out, "Stops: {}", response.stop_count);
    let _ = writeln!(
        out,
        "Total distance: {} km",
        format_with_separators(response.total_distance_km)
    );
    let _ = write!(
        out,
        "Total time: {} min",
        format_with_separators(response.total_time_min)
    );
    out
}

/// One line per engine: codes joined by arrows, then totals.
pub fn render_summary_line(response: &PathResponse) -> String {
    format!(
        "{:<10}{} ({} km, {} min, {})",
        format!("{}:", response.algorithm),
        response.codes().join(" -> "),
        format_with_separators(response.total_distance_km),
        format_with_separators(response.total_time_min),
        plural(response.stop_count, "stop", "stops")
    )
}

pub fn render_comparison(comparison: &PathComparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_summary_line(&comparison.dijkstra));
    let _ = write!(out, "{}", render_summary_line(&comparison.bfs));
    if comparison.dijkstra.codes() == comparison.bfs.codes() {
        out.push_str("\nBoth algorithms chose the same path.");
    }
    out
}

pub fn render_statistics(statistics: &GraphStatistics) -> String {
    format!(
        "{}, {}, density {:.4}",
        plural(statistics.vertex_count, "airport", "airports"),
        plural(statistics.edge_count, "route", "routes"),
        statistics.density
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use airpath_lib::PathStop;

    fn response(algorithm: PathAlgorithm, codes: &[&str], distance: u64, time: u64) -> PathResponse {
        PathResponse {
            algorithm,
            origin_code: codes[0].to_string(),
            destination_code: codes[codes.len() - 1].to_string(),
            path: codes
                .iter()
                .enumerate()
                .map(|(order, code)| PathStop {
                    code: code.to_string(),
                    name: format!("{code} Airport"),
                    order,
                })
                .collect(),
            total_distance_km: distance,
            total_time_min: time,
            stop_count: codes.len() - 1,
        }
    }

    #[test]
    fn separators() {
        assert_eq!(format_with_separators(0), "0");
        assert_eq!(format_with_separators(999), "999");
        assert_eq!(format_with_separators(2125), "2,125");
        assert_eq!(format_with_separators(1_234_567), "1,234,567");
    }

    #[test]
    fn path_listing_includes_every_stop_and_totals() {
        let text = render_path(&response(
            PathAlgorithm::Dijkstra,
            &["GRU", "GIG", "REC"],
            2187,
            205,
        ));
        assert!(text.starts_with("Shortest path (dijkstra): GRU -> REC"));
        assert!(text.contains("  1. GIG  GIG Airport"));
        assert!(text.contains("Stops: 2"));
        assert!(text.contains("Total distance: 2,187 km"));
        assert!(text.ends_with("Total time: 205 min"));
    }

    #[test]
    fn summary_line_pluralises_stops() {
        let line = render_summary_line(&response(PathAlgorithm::Bfs, &["GRU", "REC"], 2125, 180));
        assert_eq!(line, "bfs:      GRU -> REC (2,125 km, 180 min, 1 stop)");
    }

    #[test]
    fn comparison_notes_agreement() {
        let same = PathComparison {
            dijkstra: response(PathAlgorithm::Dijkstra, &["GRU", "REC"], 2125, 180),
            bfs: response(PathAlgorithm::Bfs, &["GRU", "REC"], 2125, 180),
        };
        assert!(render_comparison(&same).ends_with("Both algorithms chose the same path."));

        let different = PathComparison {
            dijkstra: response(PathAlgorithm::Dijkstra, &["GRU", "X", "REC"], 20, 10),
            bfs: response(PathAlgorithm::Bfs, &["GRU", "REC"], 2125, 180),
        };
        let text = render_comparison(&different);
        assert!(text.starts_with("dijkstra: GRU -> X -> REC (20 km, 10 min, 2 stops)"));
        assert!(!text.contains("same path"));
    }

    #[test]
    fn statistics_line() {
        let text = render_statistics(&GraphStatistics {
            vertex_count: 3,
            edge_count: 1,
            density: 1.0 / 6.0,
        });
        assert_eq!(text, "3 airports, 1 route, density 0.1667");
    }
}
