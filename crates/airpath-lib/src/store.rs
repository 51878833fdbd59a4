//! Data-access seam between the path engines and wherever airports and routes
//! are persisted.
//!
//! The path service only ever reads through [`AirportDirectory`]; the SQLite
//! implementation lives in [`crate::db`] and [`MemoryDirectory`] backs tests
//! and embedded use.

use serde::Serialize;

use crate::error::Result;
use crate::graph::canonical_code;

/// Numeric identifier for an airport row.
pub type AirportId = i64;

/// Airport as returned by identifier lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Airport {
    pub id: AirportId,
    pub code: String,
    pub name: String,
    pub active: bool,
}

/// Active route row joined with both endpoint airports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoute {
    pub origin_code: String,
    pub origin_name: String,
    pub destination_code: String,
    pub destination_name: String,
    pub distance_km: i64,
    pub time_min: Option<i64>,
}

/// Read access to persisted airports and routes.
pub trait AirportDirectory {
    /// Lookup an airport by numeric identifier.
    fn airport_by_id(&self, id: AirportId) -> Result<Option<Airport>>;

    /// Lookup an airport by code, ignoring case.
    fn airport_by_code(&self, code: &str) -> Result<Option<Airport>>;

    /// Every route currently flagged active.
    fn active_routes(&self) -> Result<Vec<ActiveRoute>>;

    /// Codes of all known airports, used for suggestions.
    fn airport_codes(&self) -> Result<Vec<String>>;
}

/// Route row held by [`MemoryDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRoute {
    pub origin: AirportId,
    pub destination: AirportId,
    pub distance_km: i64,
    pub time_min: Option<i64>,
    pub active: bool,
}

/// In-memory [`AirportDirectory`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    airports: Vec<Airport>,
    routes: Vec<MemoryRoute>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active airport and return its identifier.
    pub fn add_airport(&mut self, code: &str, name: &str) -> AirportId {
        let id = self.airports.len() as AirportId + 1;
        self.airports.push(Airport {
            id,
            code: code.to_string(),
            name: name.to_string(),
            active: true,
        });
        id
    }

    /// Flag an airport inactive so lookups no longer resolve it.
    pub fn deactivate_airport(&mut self, id: AirportId) {
        if let Some(airport) = self.airports.iter_mut().find(|airport| airport.id == id) {
            airport.active = false;
        }
    }

    /// Add an active route between two airport identifiers.
    pub fn add_route(
        &mut self,
        origin: AirportId,
        destination: AirportId,
        distance_km: i64,
        time_min: Option<i64>,
    ) {
        self.routes.push(MemoryRoute {
            origin,
            destination,
            distance_km,
            time_min,
            active: true,
        });
    }

    /// Convenience for wiring routes by code; unknown codes are ignored.
    pub fn connect(&mut self, origin: &str, destination: &str, distance_km: i64, time_min: i64) {
        let lookup = |code: &str| {
            self.airports
                .iter()
                .find(|airport| airport.code.eq_ignore_ascii_case(code))
                .map(|airport| airport.id)
        };
        if let (Some(from), Some(to)) = (lookup(origin), lookup(destination)) {
            self.add_route(from, to, distance_km, Some(time_min));
        }
    }

    /// Mutable access to route rows, e.g. to deactivate one.
    pub fn routes_mut(&mut self) -> &mut [MemoryRoute] {
        &mut self.routes
    }

    fn airport(&self, id: AirportId) -> Option<&Airport> {
        self.airports.iter().find(|airport| airport.id == id)
    }
}

impl AirportDirectory for MemoryDirectory {
    fn airport_by_id(&self, id: AirportId) -> Result<Option<Airport>> {
        Ok(self.airport(id).cloned())
    }

    fn airport_by_code(&self, code: &str) -> Result<Option<Airport>> {
        let code = canonical_code(code);
        Ok(self
            .airports
            .iter()
            .find(|airport| airport.code.eq_ignore_ascii_case(&code))
            .cloned())
    }

    fn active_routes(&self) -> Result<Vec<ActiveRoute>> {
        Ok(self
            .routes
            .iter()
            .filter(|route| route.active)
            .filter_map(|route| {
                let origin = self.airport(route.origin)?;
                let destination = self.airport(route.destination)?;
                Some(ActiveRoute {
                    origin_code: origin.code.clone(),
                    origin_name: origin.name.clone(),
                    destination_code: destination.code.clone(),
                    destination_name: destination.name.clone(),
                    distance_km: route.distance_km,
                    time_min: route.time_min,
                })
            })
            .collect())
    }

    fn airport_codes(&self) -> Result<Vec<String>> {
        Ok(self
            .airports
            .iter()
            .map(|airport| airport.code.clone())
            .collect())
    }
}
