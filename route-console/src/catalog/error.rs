//! Catalog API error types.

/// Errors that can occur when talking to the location/bus catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check CATALOG_API_KEY")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Disk snapshot operation failed
    #[error("cache error: {message}")]
    Cache { message: String },

    /// No catalog backend was configured
    #[error("catalog not configured")]
    NotConfigured,
}
