//! Query-string parameters for the path endpoints.

use serde::{Deserialize, Serialize};

use crate::ProblemDetails;

/// `?origin=<code|id>&destination=<code|id>`.
///
/// Both fields default to empty so a missing parameter reaches
/// [`PathQuery::require_endpoints`] and becomes a problem response instead of a
/// bare extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
}

impl PathQuery {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// Trimmed `(origin, destination)`, or a 400 naming the first blank one.
    pub fn require_endpoints(&self, request_id: &str) -> Result<(String, String), Box<ProblemDetails>> {
        let origin = self.origin.trim();
        if origin.is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "query parameter 'origin' is required",
                request_id,
            )));
        }
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "query parameter 'destination' is required",
                request_id,
            )));
        }
        Ok((origin.to_string(), destination.to_string()))
    }
}
