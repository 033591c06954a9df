//! This module exposes the types for the Airbrake notice protocol.

pub mod v3;

/// The latest version of the notice API.
pub const LATEST: u16 = 3;

/// The always latest notice protocol version.
pub mod latest {
    pub use super::v3::*;
}
