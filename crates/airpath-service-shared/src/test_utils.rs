//! Seeded fixture database for handler tests.
//!
//! The database lives in a temporary directory that is kept for the lifetime
//! of the test process.

use std::path::PathBuf;
use std::sync::OnceLock;

use airpath_lib::{NewAirport, NewRoute, SqliteDirectory};
use tempfile::TempDir;

use crate::middleware::RequestId;
use crate::state::AppState;

static FIXTURE: OnceLock<(TempDir, AppState)> = OnceLock::new();

/// Airport codes present in the fixture.
pub mod fixture_airports {
    pub const GRU: &str = "GRU";
    pub const GIG: &str = "GIG";
    pub const REC: &str = "REC";
    /// Active airport without any routes.
    pub const CNF: &str = "CNF";
    /// Inactive airport; never resolves.
    pub const POA: &str = "POA";
}

/// Build the fixture schema and rows at `path`:
/// GRU–REC 2125 km / 180 min, GRU–GIG 357 km / 55 min, GIG–REC 1830 km / 150 min.
pub fn seed_fixture(path: &std::path::Path) -> airpath_lib::Result<()> {
    let db = SqliteDirectory::create(path)?;
    let gru = db.insert_airport(&NewAirport::new(fixture_airports::GRU, "Sao Paulo/Guarulhos"))?;
    let gig = db.insert_airport(&NewAirport::new(fixture_airports::GIG, "Rio de Janeiro/Galeao"))?;
    let rec = db.insert_airport(&NewAirport::new(fixture_airports::REC, "Recife/Guararapes"))?;
    db.insert_airport(&NewAirport::new(fixture_airports::CNF, "Belo Horizonte/Confins"))?;
    db.insert_airport(&NewAirport {
        active: false,
        ..NewAirport::new(fixture_airports::POA, "Porto Alegre/Salgado Filho")
    })?;

    for (origin, destination, distance_km, time_min) in
        [(gru, rec, 2125, 180), (gru, gig, 357, 55), (gig, rec, 1830, 150)]
    {
        db.insert_route(&NewRoute {
            origin,
            destination,
            distance_km,
            time_min: Some(time_min),
            fuel_liters: None,
        })?;
    }
    Ok(())
}

/// Shared state pointing at the seeded fixture.
///
/// # Panics
///
/// Panics if the fixture cannot be created; that is a test environment problem.
pub fn test_state() -> AppState {
    FIXTURE
        .get_or_init(|| {
            let dir = TempDir::new().unwrap_or_else(|e| panic!("temp dir: {e}"));
            let path = dir.path().join("airports.db");
            seed_fixture(&path).unwrap_or_else(|e| panic!("seed fixture: {e}"));
            let state = AppState::load(&path).unwrap_or_else(|e| panic!("load fixture: {e}"));
            (dir, state)
        })
        .1
        .clone()
}

pub fn fixture_db_path() -> PathBuf {
    test_state().db_path().to_path_buf()
}

pub fn test_request_id() -> String {
    format!("test-{}", RequestId::generate())
}
