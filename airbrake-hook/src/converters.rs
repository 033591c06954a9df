use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use log::kv::{self, VisitSource};
use tracing_core::field::{Field, Visit};

use crate::{CapturedError, Entry, FieldValue, Fields, Level};

const MESSAGE_FIELD: &str = "message";

/// Creates an [`Entry`] from a given [`log::Record`].
///
/// Key-values of the record become fields. Values captured as errors become
/// [`CapturedError`]s.
pub fn entry_from_record(record: &log::Record<'_>) -> Entry {
    let mut visitor = RecordVisitor::default();
    // the visitor never fails
    let _ = record.key_values().visit(&mut visitor);

    Entry {
        level: Level::from(record.level()),
        message: record.args().to_string(),
        data: visitor.0,
    }
}

#[derive(Default)]
struct RecordVisitor(Fields);

impl<'kvs> VisitSource<'kvs> for RecordVisitor {
    fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.0.insert(key.as_str().to_owned(), field_from_kv(&value));
        Ok(())
    }
}

fn field_from_kv(value: &kv::Value<'_>) -> FieldValue {
    if let Some(err) = value.to_borrowed_error() {
        return FieldValue::Error(Arc::new(CapturedError::from_error(err)));
    }
    if let Some(v) = value.to_bool() {
        return FieldValue::Bool(v);
    }
    if let Some(v) = value.to_i64() {
        return FieldValue::I64(v);
    }
    if let Some(v) = value.to_u64() {
        return FieldValue::U64(v);
    }
    if let Some(v) = value.to_f64() {
        return FieldValue::F64(v);
    }
    match value.to_borrowed_str() {
        Some(s) => FieldValue::String(s.to_owned()),
        None => FieldValue::String(value.to_string()),
    }
}

/// Creates an [`Entry`] from a given [`tracing_core::Event`].
///
/// The `message` field becomes the entry message. Fields recorded as errors
/// become [`CapturedError`]s.
pub fn entry_from_event(event: &tracing_core::Event<'_>) -> Entry {
    let mut visitor = EventVisitor::default();
    event.record(&mut visitor);

    Entry {
        level: Level::from(*event.metadata().level()),
        message: visitor.message.unwrap_or_default(),
        data: visitor.fields,
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Fields,
}

impl EventVisitor {
    fn record(&mut self, field: &Field, value: FieldValue) {
        self.fields.insert(field.name().to_owned(), value);
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value = format!("{:?}", value);
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value);
        } else {
            self.record(field, FieldValue::String(value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_owned());
        } else {
            self.record(field, FieldValue::String(value.to_owned()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record(field, FieldValue::U64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record(field, FieldValue::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn StdError + 'static)) {
        self.record(
            field,
            FieldValue::Error(Arc::new(CapturedError::from_error(value))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_record() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such table");
        let kvs: Vec<(&str, kv::Value<'_>)> = vec![
            ("user_id", kv::Value::from(42i64)),
            ("retries", kv::Value::from(3u64)),
            ("ratio", kv::Value::from(0.5f64)),
            ("cached", kv::Value::from(false)),
            ("error", kv::Value::from_dyn_error(&err)),
        ];
        let entry = entry_from_record(
            &log::Record::builder()
                .level(log::Level::Error)
                .args(format_args!("query failed"))
                .key_values(&kvs)
                .build(),
        );

        assert_eq!(entry.level, Level::Error);
        assert_eq!(entry.message, "query failed");
        assert!(matches!(entry.data["user_id"], FieldValue::I64(42)));
        assert!(matches!(entry.data["retries"], FieldValue::I64(3)));
        assert!(matches!(entry.data["cached"], FieldValue::Bool(false)));
        assert_eq!(entry.data["ratio"].to_string(), "0.5");

        let error = entry.data["error"].as_error().unwrap();
        assert_eq!(error.to_string(), "no such table");
        assert_eq!(airbrake_core::utils::parse_type_from_debug(&**error), "Custom");
    }
}
