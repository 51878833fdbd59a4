//! airpath path planning HTTP microservice.
//!
//! # Endpoints
//!
//! - `GET /api/v1/paths/shortest?origin=&destination=` - Lowest total distance (Dijkstra)
//! - `GET /api/v1/paths/fewest-stops?origin=&destination=` - Fewest legs (breadth-first)
//! - `GET /api/v1/paths/compare?origin=&destination=` - Both of the above on one graph snapshot
//! - `GET /api/v1/graph` - Active route network with statistics
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! Origins and destinations are airport codes (any case) or numeric ids.
//!
//! # Configuration
//!
//! - `AIRPATH_DB_PATH` - Path to the airport database (default: `airports.db`)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `METRICS_ENABLED` / `METRICS_PATH` - Prometheus endpoint toggle and route

use std::env;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use airpath_lib::{
    Error as LibError, GraphExport, PathAlgorithm, PathComparison, PathRequest, PathResponse,
    SqliteDirectory, compare_paths, export_graph, plan_path,
};
use airpath_service_shared::{
    AppState, LoggingConfig, MetricsConfig, MetricsLayer, PathQuery, ProblemDetails,
    ServiceResponse, extract_or_generate_request_id, from_lib_error, health_live, health_ready,
    init_logging, init_metrics, metrics_handler, record_path_calculated, record_path_failed,
    record_path_stops,
};

const SERVICE: &str = "path";
const DEFAULT_DB_PATH: &str = "airports.db";

/// HTTP response: either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiResponse<T> {
    Success(ServiceResponse<T>),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiResponse::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            ApiResponse::Error(problem) => problem.into_response(),
        }
    }
}

/// Why a blocking unit of work produced no value.
enum Failure {
    Library(LibError),
    Aborted(JoinError),
}

impl Failure {
    fn reason(&self) -> &'static str {
        match self {
            Failure::Library(error) => error.reason(),
            Failure::Aborted(_) => "internal_error",
        }
    }

    fn into_problem(self, request_id: &str) -> ProblemDetails {
        match self {
            Failure::Library(error) => from_lib_error(&error, request_id),
            Failure::Aborted(error) => {
                error!(request_id, %error, "blocking task aborted");
                ProblemDetails::internal_error("request processing was aborted", request_id)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service(SERVICE));

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "metrics not initialised, continuing without metrics");
    }

    let db_path = env::var("AIRPATH_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(db_path = %db_path, port, "starting path service");

    let state = AppState::load(&db_path).inspect_err(|e| {
        error!(error = %e, path = %db_path, "failed to load application state");
    })?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state, &metrics_config)).await?;

    Ok(())
}

fn app(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route("/api/v1/paths/shortest", get(shortest_handler))
        .route("/api/v1/paths/fewest-stops", get(fewest_stops_handler))
        .route("/api/v1/paths/compare", get(compare_handler))
        .route("/api/v1/graph", get(graph_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));
    if metrics.enabled {
        router = router.route(&metrics.path, get(metrics_handler));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .with_state(state)
}

async fn shortest_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PathQuery>,
) -> ApiResponse<PathResponse> {
    path_handler(state, &headers, query, PathAlgorithm::Dijkstra).await
}

async fn fewest_stops_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PathQuery>,
) -> ApiResponse<PathResponse> {
    path_handler(state, &headers, query, PathAlgorithm::Bfs).await
}

async fn path_handler(
    state: AppState,
    headers: &HeaderMap,
    query: PathQuery,
    algorithm: PathAlgorithm,
) -> ApiResponse<PathResponse> {
    let request_id = extract_or_generate_request_id(headers);
    let (origin, destination) = match query.require_endpoints(request_id.as_str()) {
        Ok(endpoints) => endpoints,
        Err(problem) => {
            record_path_failed("invalid_request", SERVICE);
            return ApiResponse::Error(*problem);
        }
    };

    info!(
        request_id = %request_id,
        origin = %origin,
        destination = %destination,
        algorithm = %algorithm,
        "handling path request"
    );

    let request = PathRequest {
        origin,
        destination,
        algorithm,
    };
    match with_directory(state, move |directory| plan_path(directory, &request)).await {
        Ok(response) => {
            record_success(&response);
            ApiResponse::Success(ServiceResponse::new(response))
        }
        Err(failure) => {
            record_path_failed(failure.reason(), SERVICE);
            ApiResponse::Error(failure.into_problem(request_id.as_str()))
        }
    }
}

async fn compare_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PathQuery>,
) -> ApiResponse<PathComparison> {
    let request_id = extract_or_generate_request_id(&headers);
    let (origin, destination) = match query.require_endpoints(request_id.as_str()) {
        Ok(endpoints) => endpoints,
        Err(problem) => {
            record_path_failed("invalid_request", SERVICE);
            return ApiResponse::Error(*problem);
        }
    };

    info!(
        request_id = %request_id,
        origin = %origin,
        destination = %destination,
        "handling path comparison"
    );

    match with_directory(state, move |directory| {
        compare_paths(directory, &origin, &destination)
    })
    .await
    {
        Ok(comparison) => {
            record_success(&comparison.dijkstra);
            record_success(&comparison.bfs);
            ApiResponse::Success(ServiceResponse::new(comparison))
        }
        Err(failure) => {
            record_path_failed(failure.reason(), SERVICE);
            ApiResponse::Error(failure.into_problem(request_id.as_str()))
        }
    }
}

async fn graph_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResponse<GraphExport> {
    let request_id = extract_or_generate_request_id(&headers);
    match with_directory(state, |directory| export_graph(directory)).await {
        Ok(export) => {
            info!(
                request_id = %request_id,
                vertices = export.statistics.vertex_count,
                edges = export.statistics.edge_count,
                "graph exported"
            );
            ApiResponse::Success(ServiceResponse::new(export))
        }
        Err(failure) => ApiResponse::Error(failure.into_problem(request_id.as_str())),
    }
}

/// Open a connection and run `work` on the blocking pool.
async fn with_directory<T, F>(state: AppState, work: F) -> Result<T, Failure>
where
    T: Send + 'static,
    F: FnOnce(&SqliteDirectory) -> airpath_lib::Result<T> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || {
        let directory = state.directory()?;
        work(&directory)
    })
    .await;

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(Failure::Library(error)),
        Err(error) => Err(Failure::Aborted(error)),
    }
}

fn record_success(response: &PathResponse) {
    let algorithm = response.algorithm.to_string();
    record_path_calculated(&algorithm, SERVICE);
    record_path_stops(response.stop_count, &algorithm);
}
