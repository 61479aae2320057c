/// Errors that might occur when using the library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Attempted to create a post with no raw content.
    #[error("post is empty (no raw content)")]
    EmptyPost,

    /// The server answered 404 for the requested resource. Deleted and hidden posts usually show
    /// up this way.
    #[error("not found: {path}")]
    NotFound {
        /// Path of the request that failed.
        path: String,
    },

    /// The server refused an upload. The response body is kept because Discourse explains the
    /// refusal there (file too large, extension not allowed, ...).
    #[error("upload rejected ({status}): {body}")]
    UploadRejected {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Response body, as text.
        body: String,
    },

    /// An I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// An HTTP client error (including status codes indicating failure).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl Error {
    /// Returns true if this error is a 404 from the server.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
