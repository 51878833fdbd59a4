mod common;

use airpath_lib::{
    compare_paths, export_graph, plan_path, resolve_airport, AirportDirectory, Error, NewAirport,
    NewRoute, PathAlgorithm, PathFailure, PathRequest, SqliteDirectory,
};
use tempfile::TempDir;

#[test]
fn dijkstra_plan_is_enriched_with_names() {
    let directory = common::brazil_directory();
    let response = plan_path(&directory, &PathRequest::dijkstra("gru", "REC")).expect("path");

    assert_eq!(response.algorithm, PathAlgorithm::Dijkstra);
    assert_eq!(response.origin_code, "GRU");
    assert_eq!(response.destination_code, "REC");
    assert_eq!(response.codes(), vec!["GRU", "REC"]);
    assert_eq!(response.path[0].name, "Sao Paulo/Guarulhos");
    assert_eq!(response.path[1].order, 1);
    assert_eq!(response.total_distance_km, 2125);
    assert_eq!(response.total_time_min, 180);
    assert_eq!(response.stop_count, 1);
}

#[test]
fn numeric_identifiers_resolve_by_id() {
    let directory = common::brazil_directory();
    // Ids follow insertion order: GRU=1, GIG=2, REC=3.
    let response = plan_path(&directory, &PathRequest::bfs("2", "3")).expect("path");

    assert_eq!(response.algorithm, PathAlgorithm::Bfs);
    assert_eq!(response.codes(), vec!["GIG", "REC"]);
    assert_eq!(response.total_distance_km, 1830);
}

#[test]
fn unknown_origin_is_reported_before_destination() {
    let directory = common::brazil_directory();
    let error = plan_path(&directory, &PathRequest::dijkstra("GRX", "ZZZ")).unwrap_err();

    match error {
        Error::UnknownOrigin {
            identifier,
            suggestions,
        } => {
            assert_eq!(identifier, "GRX");
            assert!(suggestions.contains(&"GRU".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_destination_names_the_side() {
    let directory = common::brazil_directory();
    let error = plan_path(&directory, &PathRequest::dijkstra("GRU", "999")).unwrap_err();

    assert!(matches!(error, Error::UnknownDestination { .. }));
    let failure = PathFailure::from(&error);
    assert!(failure.message.starts_with("destination airport '999' not found"));
}

#[test]
fn inactive_airports_do_not_resolve() {
    let mut directory = common::brazil_directory();
    directory.deactivate_airport(3);

    assert!(resolve_airport(&directory, "REC").unwrap().is_none());
    let error = plan_path(&directory, &PathRequest::bfs("GRU", "REC")).unwrap_err();
    assert!(matches!(error, Error::UnknownDestination { .. }));
}

#[test]
fn isolated_airport_reports_no_path() {
    let directory = common::brazil_directory();
    let error = plan_path(&directory, &PathRequest::dijkstra("GRU", "CNF")).unwrap_err();

    assert!(matches!(error, Error::NoPathFound { .. }));
    assert_eq!(error.to_string(), "no route exists between GRU and CNF");
}

#[test]
fn deactivated_route_disconnects_graph() {
    let mut directory = common::brazil_directory();
    for route in directory.routes_mut() {
        route.active = false;
    }

    let error = plan_path(&directory, &PathRequest::bfs("GRU", "REC")).unwrap_err();
    assert!(matches!(error, Error::NoPathFound { .. }));
}

#[test]
fn comparison_shows_divergent_engines() {
    let mut directory = common::brazil_directory();
    directory.add_airport("XXX", "Waypoint");
    directory.connect("GRU", "XXX", 10, 5);
    directory.connect("XXX", "REC", 10, 5);

    let comparison = compare_paths(&directory, "GRU", "REC").expect("both paths");
    assert_eq!(comparison.dijkstra.codes(), vec!["GRU", "XXX", "REC"]);
    assert_eq!(comparison.dijkstra.total_distance_km, 20);
    assert_eq!(comparison.bfs.codes(), vec!["GRU", "REC"]);
    assert_eq!(comparison.bfs.stop_count, 1);
}

#[test]
fn response_serializes_expected_fields() {
    let directory = common::brazil_directory();
    let response = plan_path(&directory, &PathRequest::dijkstra("GRU", "GIG")).unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["algorithm"], "dijkstra");
    assert_eq!(json["origin_code"], "GRU");
    assert_eq!(json["path"][1]["code"], "GIG");
    assert_eq!(json["total_distance_km"], 357);
    assert_eq!(json["stop_count"], 1);
}

#[test]
fn sqlite_directory_round_trip() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("airports.db");

    {
        let db = SqliteDirectory::create(&db_path).expect("create db");
        let gru = db.insert_airport(&NewAirport::new("GRU", "Guarulhos")).unwrap();
        let gig = db.insert_airport(&NewAirport::new("GIG", "Galeao")).unwrap();
        let rec = db.insert_airport(&NewAirport::new("rec", "Recife")).unwrap();
        for (origin, destination, distance_km, time_min) in [
            (gru, rec, 2125, 180),
            (gru, gig, 357, 55),
            (gig, rec, 1830, 150),
        ] {
            db.insert_route(&NewRoute {
                origin,
                destination,
                distance_km,
                time_min: Some(time_min),
                fuel_liters: None,
            })
            .expect("insert route");
        }
    }

    let db = SqliteDirectory::open(&db_path).expect("reopen db");
    assert_eq!(db.airport_count().unwrap(), 3);
    assert_eq!(db.airport_codes().unwrap(), vec!["GIG", "GRU", "REC"]);

    let response = plan_path(&db, &PathRequest::dijkstra("rec", "GIG")).expect("path");
    assert_eq!(response.codes(), vec!["REC", "GIG"]);
    assert_eq!(response.path[0].name, "Recife");

    let export = export_graph(&db).expect("export");
    assert_eq!(export.statistics.vertex_count, 3);
    assert_eq!(export.statistics.edge_count, 3);
}

#[test]
fn maximal_stored_distances_do_not_abort_planning() {
    let db = SqliteDirectory::open_in_memory().expect("in-memory db");
    let ids: Vec<_> = ["AAA", "BBB", "CCC"]
        .into_iter()
        .map(|code| db.insert_airport(&NewAirport::new(code, code)).unwrap())
        .collect();
    for pair in ids.windows(2) {
        db.insert_route(&NewRoute {
            origin: pair[0],
            destination: pair[1],
            distance_km: i64::MAX,
            time_min: Some(i64::MAX),
            fuel_liters: None,
        })
        .expect("insert route");
    }

    let shortest = plan_path(&db, &PathRequest::dijkstra("AAA", "CCC")).expect("dijkstra");
    assert_eq!(shortest.codes(), vec!["AAA", "BBB", "CCC"]);
    assert_eq!(shortest.total_distance_km, u64::MAX - 1);

    let fewest = plan_path(&db, &PathRequest::bfs("AAA", "CCC")).expect("bfs");
    assert_eq!(fewest.total_distance_km, shortest.total_distance_km);
}

#[test]
fn sqlite_open_rejects_foreign_schema() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("other.db");
    let connection = rusqlite::Connection::open(&db_path).unwrap();
    connection
        .execute_batch("CREATE TABLE things (id INTEGER PRIMARY KEY);")
        .unwrap();
    drop(connection);

    let error = SqliteDirectory::open(&db_path).unwrap_err();
    assert!(matches!(error, Error::UnsupportedSchema));
}
