use thiserror::Error;

/// Convenient result alias for the AirMap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a city code does not exist in the map.
    #[error("unknown city code: {code}{}", format_suggestions(.suggestions))]
    NotFound {
        code: String,
        suggestions: Vec<String>,
    },

    /// Raised when adding a city whose code is already present.
    #[error("city {code} already exists")]
    DuplicateNode { code: String },

    /// Raised when a route references a missing city or an unconnected leg.
    #[error("invalid route: {}", .path.join("-"))]
    InvalidRoute { path: Vec<String> },

    /// Raised when no route connects two existing cities.
    #[error("no route found between {start} and {goal}")]
    NoPathFound { start: String, goal: String },

    /// Raised when map data or an edited value cannot be interpreted.
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    /// Raised when a flight distance is negative or not a finite number.
    #[error("invalid flight distance {distance}; distances must be finite and non-negative")]
    InvalidDistance { distance: f64 },

    /// Raised when no map file could be resolved for loading.
    #[error("no map data found; pass --map or set AIRMAP_MAP_FILE")]
    MapNotFound,

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for saved map state")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput {
            message: message.into(),
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
