//! This crate provides the core of the Airbrake notifier, which turns Rust
//! errors into Airbrake notices and submits them to the v3 notice API.
//!
//! `airbrake-core` is meant for authors of integrations, such as the logging
//! hook in `airbrake-hook`, and for applications that want to report errors
//! directly.
//!
//! # Core Concepts
//!
//! The [`Notifier`] is configured by [`NotifierOptions`]. It builds a
//! [`Notice`](protocol::Notice) from an error and an optional inbound HTTP
//! request, passes it through the registered notice filters and hands it to
//! its [`Transport`]. Sending is synchronous and the outcome is returned to
//! the caller.
//!
//! ```
//! use airbrake_core::test::{test_options, TestTransport};
//! use airbrake_core::Notifier;
//!
//! let transport = TestTransport::new();
//! let notifier = Notifier::with_options(test_options(&transport));
//!
//! let request = http::Request::get("https://example.com/checkout").body(()).unwrap();
//! let err = "x".parse::<u8>().unwrap_err();
//! let response = notifier.notify(err, Some(&request)).unwrap();
//! assert!(response.is_some());
//!
//! let notices = transport.fetch_and_clear_notices();
//! assert_eq!(notices[0].context_str("httpMethod"), Some("GET"));
//! ```
//!
//! # Features
//!
//! - `feature = "reqwest"`: Enables the blocking [`reqwest`] based HTTP
//!   transport, which is the default transport. *Enabled by default*
//! - `feature = "native-tls"`: Uses the `native-tls` crate for TLS.
//!   *Enabled by default*
//! - `feature = "rustls"`: Uses `rustls` for TLS instead.
//!
//! [`reqwest`]: https://crates.io/crates/reqwest

#![warn(missing_docs)]

// macros; these need to be first to be used by other modules
#[macro_use]
mod macros;

mod backtrace_support;
mod constants;
mod defaults;
mod error;
mod notice;
mod notifier;
mod options;
mod ratelimit;
mod transport;

pub mod logger;
pub mod test;
pub mod transports;
pub mod utils;

// public api or exports from this crate
pub use crate::backtrace_support::{backtrace_to_frames, current_backtrace};
pub use crate::constants::{DEFAULT_HOST, USER_AGENT, VERSION};
pub use crate::defaults::apply_defaults;
pub use crate::error::Error;
pub use crate::notice::{error_info_from_error, errors_from_error, request_info_from_request};
pub use crate::notifier::{NoticeFilter, Notifier};
pub use crate::options::NotifierOptions;
pub use crate::ratelimit::parse_retry_after;
pub use crate::transport::{Transport, TransportFactory};

// public api from other crates
#[doc(inline)]
pub use airbrake_types as types;
pub use airbrake_types::protocol::v3 as protocol;
