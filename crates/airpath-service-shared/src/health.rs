//! Liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok`, or `not_ready: <reason>`.
    pub status: String,

    pub service: String,

    pub version: String,

    /// Airports in the database (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airports_loaded: Option<usize>,

    /// Route rows in the database, active or not (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes_loaded: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            airports_loaded: None,
            routes_loaded: None,
        }
    }

    pub fn ready(service: &str, version: &str, airports: usize, routes: usize) -> Self {
        Self {
            airports_loaded: Some(airports),
            routes_loaded: Some(routes),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {reason}"),
            ..Self::alive(service, version)
        }
    }
}

/// `GET /health/live`: always 200 while the process is serving.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// `GET /health/ready`: 200 once the database opens and holds at least one
/// airport, 503 otherwise.
///
/// ```text
/// {"status":"ok","service":"airpath-service-shared","version":"0.1.0","airports_loaded":4,"routes_loaded":3}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let counts = tokio::task::spawn_blocking(move || {
        let directory = state.directory()?;
        Ok::<_, airpath_lib::Error>((directory.airport_count()?, directory.route_count()?))
    })
    .await;

    let status = match counts {
        Ok(Ok((0, _))) => HealthStatus::not_ready(service, version, "no airports loaded"),
        Ok(Ok((airports, routes))) => {
            return (
                StatusCode::OK,
                Json(HealthStatus::ready(service, version, airports, routes)),
            )
                .into_response();
        }
        Ok(Err(error)) => {
            tracing::warn!(%error, "readiness check failed");
            HealthStatus::not_ready(service, version, &error.to_string())
        }
        Err(error) => {
            tracing::error!(%error, "readiness task panicked");
            HealthStatus::not_ready(service, version, "readiness check aborted")
        }
    };
    (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_has_no_counts() {
        let status = HealthStatus::alive("path", "1.0.0");
        assert_eq!(status.status, "ok");
        assert!(status.airports_loaded.is_none());

        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("airports_loaded"));
    }

    #[test]
    fn ready_reports_counts() {
        let status = HealthStatus::ready("path", "1.0.0", 4, 3);
        assert_eq!(status.status, "ok");
        assert_eq!(status.airports_loaded, Some(4));
        assert_eq!(status.routes_loaded, Some(3));
    }

    #[test]
    fn not_ready_carries_reason() {
        let status = HealthStatus::not_ready("path", "1.0.0", "no airports loaded");
        assert_eq!(status.status, "not_ready: no airports loaded");
    }
}
