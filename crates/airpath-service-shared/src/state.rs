//! Application state for HTTP microservices.
//!
//! The state only remembers where the airport database lives. Each request
//! opens its own [`SqliteDirectory`] on a blocking thread, so no graph or
//! connection is shared between requests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use airpath_lib::{Error as LibError, SqliteDirectory};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Database file not found.
    DatabaseNotFound(String),

    /// The file exists but could not be opened as an airport database.
    DatabaseOpen(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseNotFound(path) => write!(f, "database not found: {path}"),
            Self::DatabaseOpen(e) => write!(f, "failed to open airport database: {e}"),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DatabaseOpen(e) => Some(e),
            Self::DatabaseNotFound(_) => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::DatabaseOpen(err)
    }
}

/// Shared application state for all axum handlers. Cheap to clone.
///
/// ```ignore
/// use axum::{extract::State, routing::get, Router};
/// use airpath_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let directory = state.directory().unwrap();
///     // ... query directory
/// }
///
/// let state = AppState::load("airports.db").unwrap();
/// let app = Router::new()
///     .route("/api/v1/paths/shortest", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db_path: PathBuf,
}

impl AppState {
    /// Check that `db_path` is an airport database and remember its location.
    ///
    /// The probe connection is closed again before returning.
    pub fn load(db_path: impl AsRef<Path>) -> Result<Self, AppStateError> {
        let db_path = db_path.as_ref();

        if !db_path.exists() {
            return Err(AppStateError::DatabaseNotFound(
                db_path.display().to_string(),
            ));
        }

        tracing::info!(path = %db_path.display(), "checking airport database");
        let directory = SqliteDirectory::open(db_path)?;
        tracing::info!(
            airports = directory.airport_count()?,
            routes = directory.route_count()?,
            "airport database ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                db_path: db_path.to_path_buf(),
            }),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.inner.db_path
    }

    /// Open a fresh connection for one request. Blocking; call it from
    /// `spawn_blocking`.
    pub fn directory(&self) -> airpath_lib::Result<SqliteDirectory> {
        SqliteDirectory::open(&self.inner.db_path)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db_path", &self.inner.db_path)
            .finish()
    }
}
