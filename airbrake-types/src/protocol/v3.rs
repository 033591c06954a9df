//! The current latest Airbrake notice protocol version.
//!
//! Most of the types in this module serialize to and from the JSON format
//! accepted by the `/api/v3/projects/{id}/notices` endpoint.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use serde_json::{Map, Value};

/// A single frame of a backtrace.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct StackFrame {
    /// The file the frame is located in, if known.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    /// The line number if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// The column number if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// The demangled name of the function.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub function: String,
}

/// Represents a single error of a notice.
///
/// A notice carries a chain of these, outermost first.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct ErrorInfo {
    /// The type of the error.
    #[serde(rename = "type")]
    pub ty: String,
    /// The error message.
    #[serde(default)]
    pub message: String,
    /// The backtrace of the error, innermost frame first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backtrace: Vec<StackFrame>,
}

/// A snapshot of the inbound HTTP request a notice is associated with.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct RequestInfo {
    /// The request method, e.g. `GET`.
    pub method: String,
    /// The full request URL as received.
    pub url: String,
    /// Request headers. Repeated headers are joined with `", "`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Decoded query string parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,
    /// The address of the client as reported by proxy headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
}

/// Information about the notifier that created a notice.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct NotifierInfo {
    /// The name of the notifier.
    pub name: String,
    /// The version of the notifier.
    pub version: String,
    /// Where to find out more about the notifier.
    pub url: String,
}

/// The payload sent to the notice endpoint.
///
/// Besides the serialized fields a notice keeps the primary error it was
/// created from and the associated request. Both are local to the process and
/// never sent: the request data is projected into `context`, `environment`
/// and `params` when the notice is built.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Notice {
    /// The error chain, outermost error first.
    pub errors: Vec<ErrorInfo>,
    /// Free-form context of the notice (`environment`, `revision`, `url`, ...).
    #[serde(default)]
    pub context: Map<String, Value>,
    /// Environment of the request, usually request headers.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub environment: Map<String, Value>,
    /// Session data.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub session: Map<String, Value>,
    /// Request parameters.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
    /// The primary error this notice was created from.
    #[serde(skip)]
    pub error: Option<Arc<dyn Error + Send + Sync>>,
    /// The request this notice is associated with.
    #[serde(skip)]
    pub request: Option<RequestInfo>,
}

impl Notice {
    /// Sets a context value.
    pub fn set_context<V: Into<Value>>(&mut self, key: impl Into<String>, value: V) {
        self.context.insert(key.into(), value.into());
    }

    /// Looks up a context value as a string.
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(Value::as_str)
    }

    /// Returns the message of the outermost error.
    pub fn message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

impl fmt::Debug for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notice")
            .field("errors", &self.errors)
            .field("context", &self.context)
            .field("environment", &self.environment)
            .field("session", &self.session)
            .field("params", &self.params)
            .field("request", &self.request)
            .finish()
    }
}

/// The body of a successful notice submission.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct NoticeResponse {
    /// The ID assigned to the notice.
    pub id: String,
    /// A link to the notice in the Airbrake dashboard.
    #[serde(default)]
    pub url: String,
}

/// The body of a rejected notice submission.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct ApiErrorResponse {
    /// What the service did not like about the notice.
    #[serde(default)]
    pub message: String,
}
