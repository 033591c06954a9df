//! Reports log entries to [Airbrake].
//!
//! The [`AirbrakeHook`] is a [`Hook`]: a callback a logging pipeline invokes
//! for entries of selected levels. It fires on error, fatal and panic
//! entries and turns each of them into an Airbrake notice, tagged with the
//! deployment environment and the build revision from `GIT_COMMIT_LONG`.
//!
//! Hooks are collected in [`Hooks`], which the front ends of this crate
//! dispatch to:
//!
//! - [`AirbrakeLogger`] implements [`log::Log`].
//! - [`AirbrakeLayer`] implements a [`tracing_subscriber::Layer`].
//! - [`register_panic_hook`] reports panics.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use airbrake_hook::{AirbrakeHook, AirbrakeLogger, Hooks};
//!
//! let mut hooks = Hooks::new();
//! hooks.add(Arc::new(AirbrakeHook::new(12345, "0123456789abcdef", "production")));
//! airbrake_hook::register_panic_hook(hooks.clone());
//!
//! let logger = AirbrakeLogger::new(hooks);
//! let max_level = logger.max_level();
//! log::set_boxed_logger(Box::new(logger))
//!     .map(|()| log::set_max_level(max_level))
//!     .unwrap();
//!
//! log::error!(order_id = 17; "payment failed");
//! ```
//!
//! # Features
//!
//! - `feature = "reqwest"`: Sends notices over HTTP with `reqwest`.
//!   *Enabled by default*
//! - `feature = "native-tls"` / `feature = "rustls"`: The TLS implementation.
//!
//! [Airbrake]: https://airbrake.io/

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod airbrake;
mod converters;
mod entry;
mod hook;
mod layer;
mod level;
mod logger;
mod panic;

pub use crate::airbrake::{
    AirbrakeHook, DEFAULT_LEVELS, DEVELOPMENT, REVISION_ENV_KEY, STACK_DEPTH,
};
pub use crate::converters::{entry_from_event, entry_from_record};
pub use crate::entry::{CapturedError, Entry, FieldValue, Fields, MessageError};
pub use crate::hook::{Hook, HookError, Hooks};
pub use crate::layer::{layer, AirbrakeLayer};
pub use crate::level::{Level, ParseLevelError};
pub use crate::logger::AirbrakeLogger;
pub use crate::panic::{entry_from_panic_info, message_from_panic_info, register_panic_hook};

#[doc(no_inline)]
pub use airbrake_core;
