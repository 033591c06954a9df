//! This crate provides common types for working with the Airbrake notice
//! protocol.
//!
//! Most users will not need to use this crate directly. The `airbrake-core`
//! crate re-exports everything that is needed to build and send notices.
//!
//! # Protocol
//!
//! The [`protocol`] module contains the types of the v3 notice API: the
//! [`Notice`](protocol::v3::Notice) payload and the responses returned by the
//! notice endpoint.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod project_id;
pub mod protocol;

pub use crate::project_id::*;
