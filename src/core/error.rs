use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum DashError {
    /// An error occurred during an HTTP request (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// A response or stored value was not valid JSON, or did not have the expected shape.
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A source yielded too few usable entries.
    #[error("Empty result: {0}")]
    Empty(String),

    /// The data was present but unusable.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// A user action required a selected news item, but none is selected.
    #[error("no news item is selected")]
    NoSelection,

    /// A command referenced a row or item that does not exist.
    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        /// Which collection was indexed (`"news"`, `"zone"`).
        what: &'static str,
        /// The requested index.
        index: usize,
        /// The collection length at the time of the request.
        len: usize,
    },

    /// Reading or writing local files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTML template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}
