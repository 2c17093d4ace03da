use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
///
/// Field heuristics never produce one of these: a missed field degrades to its
/// sentinel value instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The remote analysis service rejected the request or returned an unusable answer.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// The page kept navigating while an extraction was in flight.
    #[error("route changed {restarts} times during extraction; giving up")]
    RouteUnstable {
        /// How many times extraction was restarted before giving up.
        restarts: u32,
    },

    /// The backing key-value store failed.
    #[error("Store error: {0}")]
    Store(String),
}
