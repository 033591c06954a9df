use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use airbrake_core::utils::parse_type_from_debug;
use thiserror::Error;

use crate::Level;

/// The structured fields of an [`Entry`].
///
/// Iteration is in ascending key order.
pub type Fields = BTreeMap<String, FieldValue>;

/// A value attached to a log entry.
#[derive(Clone)]
pub enum FieldValue {
    /// A string.
    String(String),
    /// A signed integer.
    I64(i64),
    /// An unsigned integer.
    U64(u64),
    /// A floating point number.
    F64(f64),
    /// A boolean.
    Bool(bool),
    /// An error value.
    Error(Arc<dyn StdError + Send + Sync>),
    /// An inbound HTTP request the entry is about.
    Request(Arc<http::Request<()>>),
}

impl FieldValue {
    /// Wraps an error.
    pub fn error<E: StdError + Send + Sync + 'static>(err: E) -> FieldValue {
        FieldValue::Error(Arc::new(err))
    }

    /// Wraps a request. The body is not kept.
    pub fn request<B>(req: http::Request<B>) -> FieldValue {
        FieldValue::Request(Arc::new(req.map(|_| ())))
    }

    /// Returns the error if this is an error value.
    pub fn as_error(&self) -> Option<&Arc<dyn StdError + Send + Sync>> {
        match self {
            FieldValue::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the request if this is a request value.
    pub fn as_request(&self) -> Option<&Arc<http::Request<()>>> {
        match self {
            FieldValue::Request(req) => Some(req),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.write_str(s),
            FieldValue::I64(v) => write!(f, "{}", v),
            FieldValue::U64(v) => write!(f, "{}", v),
            FieldValue::F64(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Error(err) => write!(f, "{}", err),
            FieldValue::Request(req) => write!(f, "{} {}", req.method(), req.uri()),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.debug_tuple("String").field(s).finish(),
            FieldValue::I64(v) => f.debug_tuple("I64").field(v).finish(),
            FieldValue::U64(v) => f.debug_tuple("U64").field(v).finish(),
            FieldValue::F64(v) => f.debug_tuple("F64").field(v).finish(),
            FieldValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            FieldValue::Error(err) => f.debug_tuple("Error").field(err).finish(),
            FieldValue::Request(req) => f.debug_tuple("Request").field(req).finish(),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident($conv:ty)),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> FieldValue {
                    FieldValue::$variant(<$conv>::from(value))
                }
            }
        )*
    };
}

impl_from! {
    String => String(String),
    &str => String(String),
    i64 => I64(i64),
    i32 => I64(i64),
    u64 => U64(u64),
    u32 => U64(u64),
    f64 => F64(f64),
    bool => Bool(bool),
}

impl From<Arc<dyn StdError + Send + Sync>> for FieldValue {
    fn from(err: Arc<dyn StdError + Send + Sync>) -> FieldValue {
        FieldValue::Error(err)
    }
}

impl From<http::Request<()>> for FieldValue {
    fn from(req: http::Request<()>) -> FieldValue {
        FieldValue::Request(Arc::new(req))
    }
}

/// A log entry as handed to hooks.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The severity of the entry.
    pub level: Level,
    /// The formatted log message.
    pub message: String,
    /// Structured fields attached to the entry.
    pub data: Fields,
}

impl Entry {
    /// Creates an entry without fields.
    pub fn new<M: Into<String>>(level: Level, message: M) -> Entry {
        Entry {
            level,
            message: message.into(),
            data: Fields::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Entry
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attaches `err` under the `error` key.
    #[must_use]
    pub fn with_error<E: StdError + Send + Sync + 'static>(self, err: E) -> Entry {
        self.with_field("error", FieldValue::error(err))
    }

    /// Attaches an inbound request under `key`.
    #[must_use]
    pub fn with_request<K: Into<String>, B>(self, key: K, req: http::Request<B>) -> Entry {
        self.with_field(key, FieldValue::request(req))
    }
}

/// An error that only consists of a message.
///
/// Entries without an `error` field are reported as this.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct MessageError(String);

impl MessageError {
    /// Creates the error.
    pub fn new<M: Into<String>>(message: M) -> MessageError {
        MessageError(message.into())
    }
}

/// A snapshot of an error that was only available by reference.
///
/// Front ends use this for errors borrowed from a log record or a tracing
/// event. The snapshot keeps the type name, the message and the source
/// chain of the original.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedError {
    ty: String,
    message: String,
    source: Option<Box<CapturedError>>,
}

impl CapturedError {
    /// Captures `err` and its sources.
    pub fn from_error(err: &(dyn StdError + 'static)) -> CapturedError {
        CapturedError {
            ty: parse_type_from_debug(err),
            message: err.to_string(),
            source: err.source().map(|source| Box::new(CapturedError::from_error(source))),
        }
    }

    /// The type name of the original error.
    pub fn type_name(&self) -> &str {
        &self.ty
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Starts with the original type name so notices keep reporting it.
impl fmt::Debug for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.ty, self.message)
    }
}

impl StdError for CapturedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|err| err as &(dyn StdError + 'static))
    }
}
