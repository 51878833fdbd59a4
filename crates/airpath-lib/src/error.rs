use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the airpath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The origin identifier did not resolve to an active airport.
    #[error("origin airport '{identifier}' not found{}", format_suggestions(.suggestions))]
    UnknownOrigin {
        identifier: String,
        suggestions: Vec<String>,
    },

    /// The destination identifier did not resolve to an active airport.
    #[error("destination airport '{identifier}' not found{}", format_suggestions(.suggestions))]
    UnknownDestination {
        identifier: String,
        suggestions: Vec<String>,
    },

    /// Both endpoints resolved but no connecting sequence of routes exists.
    #[error("no route exists between {origin} and {destination}")]
    NoPathFound { origin: String, destination: String },

    /// Raised when a route write is rejected.
    #[error("invalid route: {message}")]
    InvalidRoute { message: String },

    /// Database could not be located at the resolved path.
    #[error("database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    /// Raised when the database lacks the airports/routes tables.
    #[error("unsupported database schema; expected airports and routes tables")]
    UnsupportedSchema,

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short machine-readable label, used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::UnknownOrigin { .. } | Error::UnknownDestination { .. } => "unknown_airport",
            Error::NoPathFound { .. } => "no_path",
            Error::InvalidRoute { .. } => "invalid_route",
            Error::DatabaseNotFound { .. } | Error::UnsupportedSchema => "database",
            Error::Sqlite(_) | Error::Io(_) => "internal_error",
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
