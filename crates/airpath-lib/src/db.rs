use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::canonical_code;
use crate::store::{ActiveRoute, Airport, AirportDirectory, AirportId};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS airports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        iata_code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        city TEXT,
        country TEXT,
        latitude REAL,
        longitude REAL,
        timezone TEXT,
        active INTEGER NOT NULL DEFAULT 1
    );
    CREATE TABLE IF NOT EXISTS routes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        origin_airport_id INTEGER NOT NULL REFERENCES airports(id),
        destination_airport_id INTEGER NOT NULL REFERENCES airports(id),
        distance_km INTEGER NOT NULL,
        estimated_time_min INTEGER,
        fuel_liters REAL,
        active INTEGER NOT NULL DEFAULT 1
    );
    CREATE INDEX IF NOT EXISTS idx_routes_origin ON routes(origin_airport_id);
    CREATE INDEX IF NOT EXISTS idx_routes_destination ON routes(destination_airport_id);
    CREATE INDEX IF NOT EXISTS idx_airports_code ON airports(iata_code);
";

const AIRPORT_COLUMNS: &[&str] = &["id", "iata_code", "name", "active"];
const ROUTE_COLUMNS: &[&str] = &[
    "origin_airport_id",
    "destination_airport_id",
    "distance_km",
    "estimated_time_min",
    "active",
];

/// Airport to be inserted.
#[derive(Debug, Clone, Default)]
pub struct NewAirport {
    pub code: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub active: bool,
}

impl NewAirport {
    /// Active airport with only the required fields set.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            active: true,
            ..Self::default()
        }
    }
}

/// Route to be inserted between two airport identifiers.
#[derive(Debug, Clone, Default)]
pub struct NewRoute {
    pub origin: AirportId,
    pub destination: AirportId,
    pub distance_km: i64,
    pub time_min: Option<i64>,
    pub fuel_liters: Option<f64>,
}

/// SQLite-backed [`AirportDirectory`].
#[derive(Debug)]
pub struct SqliteDirectory {
    connection: Connection,
}

impl SqliteDirectory {
    /// Open an existing database and verify it carries the expected tables.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }
        let connection = Connection::open(path)?;
        verify_schema(&connection)?;
        debug!(path = %path.display(), "opened airport database");
        Ok(Self { connection })
    }

    /// Open or create a database file, creating the schema when missing.
    pub fn create(path: &Path) -> Result<Self> {
        let connection = Connection::open(path)?;
        connection.execute_batch(SCHEMA)?;
        debug!(path = %path.display(), "initialised airport database");
        Ok(Self { connection })
    }

    /// Fresh in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self { connection })
    }

    /// Insert an airport and return its identifier. Codes are stored in
    /// canonical uppercase form.
    pub fn insert_airport(&self, airport: &NewAirport) -> Result<AirportId> {
        self.connection.execute(
            "INSERT INTO airports
                (iata_code, name, city, country, latitude, longitude, timezone, active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                canonical_code(&airport.code),
                airport.name,
                airport.city,
                airport.country,
                airport.latitude,
                airport.longitude,
                airport.timezone,
                airport.active,
            ],
        )?;
        Ok(self.connection.last_insert_rowid())
    }

    /// Insert a route after checking both endpoints and the distance.
    pub fn insert_route(&self, route: &NewRoute) -> Result<i64> {
        if route.origin == route.destination {
            return Err(invalid_route("origin and destination must differ"));
        }
        if route.distance_km <= 0 {
            return Err(invalid_route("distance must be a positive number of km"));
        }
        if route.time_min.is_some_and(|minutes| minutes < 0) {
            return Err(invalid_route("estimated time cannot be negative"));
        }
        for (label, id) in [("origin", route.origin), ("destination", route.destination)] {
            match self.airport_by_id(id)? {
                Some(airport) if airport.active => {}
                _ => {
                    return Err(invalid_route(format!(
                        "{label} airport id {id} not found or inactive"
                    )))
                }
            }
        }

        let existing: Option<i64> = self
            .connection
            .query_row(
                "SELECT id FROM routes
                 WHERE origin_airport_id = ?1 AND destination_airport_id = ?2",
                params![route.origin, route.destination],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(invalid_route("a route between these airports already exists"));
        }

        self.connection.execute(
            "INSERT INTO routes
                (origin_airport_id, destination_airport_id, distance_km,
                 estimated_time_min, fuel_liters)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                route.origin,
                route.destination,
                route.distance_km,
                route.time_min,
                route.fuel_liters,
            ],
        )?;
        Ok(self.connection.last_insert_rowid())
    }

    /// Toggle the active flag on a route. Returns `false` when no row matched.
    pub fn set_route_active(&self, route_id: i64, active: bool) -> Result<bool> {
        let updated = self.connection.execute(
            "UPDATE routes SET active = ?1 WHERE id = ?2",
            params![active, route_id],
        )?;
        Ok(updated > 0)
    }

    pub fn airport_count(&self) -> Result<usize> {
        count_rows(&self.connection, "airports")
    }

    pub fn route_count(&self) -> Result<usize> {
        count_rows(&self.connection, "routes")
    }
}

impl AirportDirectory for SqliteDirectory {
    fn airport_by_id(&self, id: AirportId) -> Result<Option<Airport>> {
        let airport = self
            .connection
            .query_row(
                "SELECT id, iata_code, name, active FROM airports WHERE id = ?1",
                [id],
                row_to_airport,
            )
            .optional()?;
        Ok(airport)
    }

    fn airport_by_code(&self, code: &str) -> Result<Option<Airport>> {
        let airport = self
            .connection
            .query_row(
                "SELECT id, iata_code, name, active FROM airports
                 WHERE UPPER(iata_code) = UPPER(?1)",
                [code.trim()],
                row_to_airport,
            )
            .optional()?;
        Ok(airport)
    }

    fn active_routes(&self) -> Result<Vec<ActiveRoute>> {
        let mut stmt = self.connection.prepare(
            "SELECT ao.iata_code, ao.name, ad.iata_code, ad.name,
                    r.distance_km, r.estimated_time_min
             FROM routes r
             INNER JOIN airports ao ON r.origin_airport_id = ao.id
             INNER JOIN airports ad ON r.destination_airport_id = ad.id
             WHERE r.active = 1
             ORDER BY r.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ActiveRoute {
                origin_code: row.get(0)?,
                origin_name: row.get(1)?,
                destination_code: row.get(2)?,
                destination_name: row.get(3)?,
                distance_km: row.get(4)?,
                time_min: row.get(5)?,
            })
        })?;

        let mut routes = Vec::new();
        for row in rows {
            routes.push(row?);
        }
        debug!(routes = routes.len(), "loaded active routes");
        Ok(routes)
    }

    fn airport_codes(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare("SELECT iata_code FROM airports ORDER BY iata_code")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut codes = Vec::new();
        for row in rows {
            codes.push(row?);
        }
        Ok(codes)
    }
}

fn invalid_route(message: impl Into<String>) -> Error {
    Error::InvalidRoute {
        message: message.into(),
    }
}

fn row_to_airport(row: &Row<'_>) -> rusqlite::Result<Airport> {
    Ok(Airport {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        active: row.get(3)?,
    })
}

fn count_rows(connection: &Connection, table: &str) -> Result<usize> {
    let count: i64 =
        connection.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?;
    Ok(usize::try_from(count).unwrap_or(0))
}

fn verify_schema(connection: &Connection) -> Result<()> {
    let airports_ok = table_exists(connection, "airports")?
        && table_has_columns(connection, "airports", AIRPORT_COLUMNS)?;
    let routes_ok = table_exists(connection, "routes")?
        && table_has_columns(connection, "routes", ROUTE_COLUMNS)?;

    if airports_ok && routes_ok {
        Ok(())
    } else {
        Err(Error::UnsupportedSchema)
    }
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn table_has_columns(connection: &Connection, table: &str, required: &[&str]) -> Result<bool> {
    let pragma = format!("PRAGMA table_info('{table}')");
    let mut stmt = connection.prepare(&pragma)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(required.iter().all(|required| {
        columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(required))
    }))
}
