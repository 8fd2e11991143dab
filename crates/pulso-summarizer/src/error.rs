use thiserror::Error;

/// Errors returned by the narrative-summary client.
///
/// Callers never propagate these past the enrichment step; every variant
/// degrades to the report's fallback text.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status and (possibly) a message body.
    #[error("summary API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A well-formed response that contains no generated text.
    #[error("summary API returned no text")]
    EmptyResponse,
}
