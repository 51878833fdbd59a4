//! Whole-graph export for visualisation and external processing.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::graph::canonical_code;
use crate::store::AirportDirectory;

/// Airport appearing in at least one active route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportVertex {
    pub code: String,
    pub name: String,
    /// Number of active routes touching this airport.
    pub degree: usize,
}

/// One active route row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEdge {
    pub origin: String,
    pub destination: String,
    pub distance_km: i64,
    pub time_min: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub vertex_count: usize,
    pub edge_count: usize,
    /// `edges / (v * (v - 1))`, zero for fewer than two vertices.
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphExport {
    pub vertices: Vec<ExportVertex>,
    pub edges: Vec<ExportEdge>,
    pub statistics: GraphStatistics,
}

/// Export the active route network. Vertices are sorted by code, edges keep
/// the directory's row order.
pub fn export_graph(directory: &dyn AirportDirectory) -> Result<GraphExport> {
    let routes = directory.active_routes()?;
    let mut vertices: BTreeMap<String, ExportVertex> = BTreeMap::new();
    let mut edges = Vec::with_capacity(routes.len());

    for route in routes {
        let origin = canonical_code(&route.origin_code);
        let destination = canonical_code(&route.destination_code);

        for (code, name) in [
            (&origin, &route.origin_name),
            (&destination, &route.destination_name),
        ] {
            vertices
                .entry(code.clone())
                .or_insert_with(|| ExportVertex {
                    code: code.clone(),
                    name: name.clone(),
                    degree: 0,
                })
                .degree += 1;
        }

        edges.push(ExportEdge {
            origin,
            destination,
            distance_km: route.distance_km,
            time_min: route.time_min,
        });
    }

    let vertex_count = vertices.len();
    let edge_count = edges.len();
    let density = if vertex_count > 1 {
        edge_count as f64 / (vertex_count * (vertex_count - 1)) as f64
    } else {
        0.0
    };

    Ok(GraphExport {
        vertices: vertices.into_values().collect(),
        edges,
        statistics: GraphStatistics {
            vertex_count,
            edge_count,
            density,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDirectory;

    #[test]
    fn empty_directory_has_zero_density() {
        let export = export_graph(&MemoryDirectory::new()).unwrap();
        assert!(export.vertices.is_empty());
        assert_eq!(export.statistics.density, 0.0);
    }

    #[test]
    fn statistics_count_route_rows() {
        let mut directory = MemoryDirectory::new();
        directory.add_airport("GRU", "Guarulhos");
        directory.add_airport("GIG", "Galeao");
        directory.add_airport("REC", "Recife");
        directory.connect("GRU", "GIG", 357, 55);
        directory.connect("GIG", "REC", 1830, 150);

        let export = export_graph(&directory).unwrap();
        let codes: Vec<_> = export.vertices.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["GIG", "GRU", "REC"]);
        assert_eq!(export.vertices[0].degree, 2);
        assert_eq!(export.statistics.edge_count, 2);
        assert!((export.statistics.density - 2.0 / 6.0).abs() < 1e-9);
    }
}
