//! The provided transports.
//!
//! This module exposes all transports that are compiled into the library.
//! The `reqwest` feature turns on the HTTP transport.

use std::time::Duration;

use crate::protocol::{ApiErrorResponse, NoticeResponse};
use crate::Error;

#[cfg(feature = "reqwest")]
mod reqwest;
#[cfg(feature = "reqwest")]
pub use self::reqwest::ReqwestHttpTransport;

#[cfg(feature = "reqwest")]
use std::sync::Arc;

#[cfg(feature = "reqwest")]
use crate::{NotifierOptions, Transport, TransportFactory};

/// The default http transport.
#[cfg(feature = "reqwest")]
pub type HttpTransport = ReqwestHttpTransport;

/// Creates the default HTTP transport.
///
/// This is the default value for `transport` on the notifier options. It
/// creates a [`HttpTransport`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct DefaultTransportFactory;

#[cfg(feature = "reqwest")]
impl TransportFactory for DefaultTransportFactory {
    fn create_transport(&self, options: &NotifierOptions) -> Arc<dyn Transport> {
        Arc::new(HttpTransport::new(options))
    }
}

/// Interprets the answer of the notice endpoint.
///
/// `retry_after` is the delay announced by the service with a `429`, if any.
pub fn parse_response(
    status: u16,
    retry_after: Option<Duration>,
    body: &str,
) -> Result<NoticeResponse, Error> {
    match status {
        200 | 201 => Ok(serde_json::from_str(body)?),
        400 => {
            let message = serde_json::from_str::<ApiErrorResponse>(body)
                .map(|err| err.message)
                .ok()
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| body.to_owned());
            Err(Error::BadRequest(message))
        }
        401 => Err(Error::Unauthorized),
        413 => Err(Error::NoticeTooBig),
        429 => Err(Error::RateLimited {
            retry_after: retry_after.unwrap_or(DEFAULT_RATE_LIMIT_DELAY),
        }),
        status => Err(Error::UnexpectedStatus {
            status,
            body: body.to_owned(),
        }),
    }
}

/// How long to back off from a `429` that does not say how long.
const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(60);
