use thiserror::Error;

/// Errors returned by the Google Places client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response envelope carried a `status` other than `"OK"`.
    #[error("Places API {op} returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    ApiStatus {
        op: &'static str,
        status: String,
        message: Option<String>,
    },

    /// No place matched the location text.
    #[error("no place found for \"{0}\"")]
    NoCandidates(String),

    /// A details response with status `"OK"` but no `result` object.
    #[error("place details for {place_id} had no result")]
    MissingResult { place_id: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
