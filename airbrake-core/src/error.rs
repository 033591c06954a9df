use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

/// Why a notice could not be delivered.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The options are missing a project id or key.
    #[error("project id and project key are required")]
    MissingCredentials,
    /// The service rejected the project id or key.
    #[error("unauthorized: project id or key are wrong")]
    Unauthorized,
    /// The service asked to hold off sending notices.
    #[error("IP is rate limited, retry in {}s", .retry_after.as_secs())]
    RateLimited {
        /// How long to wait before sending again.
        retry_after: Duration,
    },
    /// The serialized notice exceeds what the service accepts.
    #[error("notice exceeds the maximum size accepted by the service")]
    NoticeTooBig,
    /// The service rejected the notice.
    #[error("{0}")]
    BadRequest(String),
    /// The service answered with a status the notifier does not understand.
    #[error("got unexpected response status={status} body={body:?}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The response body.
        body: String,
    },
    /// The notice could not be serialized, or a response could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The request never got an answer.
    #[error("request failed: {0}")]
    Http(#[source] Box<dyn StdError + Send + Sync>),
    /// The transport's worker thread is gone.
    #[error("transport thread is not running")]
    TransportClosed,
    /// The notifier has no transport to send with.
    #[error("no transport configured")]
    NoTransport,
}

impl Error {
    /// Wraps an error of the underlying HTTP client.
    pub fn http<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Error::Http(Box::new(err))
    }
}
