//! The record handed to the renderer, and how `log` records are turned into one.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use log::kv::{Error, Key, Value, VisitSource};
use serde::Serialize;

use crate::severity::Severity;

/// A single log event, as seen by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub severity: Severity,
    pub message: String,
    pub context: Context,
}

impl LogRecord {
    /// A record with an empty context.
    pub fn new<T>(severity: Severity, message: T) -> LogRecord
    where
        T: Into<String>,
    {
        LogRecord {
            severity,
            message: message.into(),
            context: Context::new(),
        }
    }

    /// Appends a context entry.
    #[must_use]
    pub fn with_context<K, V>(mut self, key: K, value: V) -> LogRecord
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.context.push(key, value);
        self
    }

    /// Converts a `log` record, classifying each of its key/values.
    ///
    /// Errors captured with `:err` take their file and line from the call site
    /// of the record, since `std::error::Error` carries no location of its own.
    pub fn from_log(record: &log::Record<'_>) -> LogRecord {
        let mut visitor = LogVisitor {
            context: Context::new(),
            file: record.file(),
            line: record.line(),
        };
        // a source that fails part way still leaves the pairs visited so far
        let _ = record.key_values().visit(&mut visitor);
        LogRecord {
            severity: record.level().into(),
            message: record.args().to_string(),
            context: visitor.context,
        }
    }
}

/// Named values attached to a record, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context(Vec<(String, ContextValue)>);

impl Context {
    pub fn new() -> Context {
        Context(Vec::new())
    }

    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.0.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<ContextValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Context(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A context value, classified once when the record is ingested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextValue {
    /// Plain text, shown as is.
    Scalar(String),
    /// A sequence or map, held as compact JSON.
    Structured(String),
    /// An error, rendered as its own card section.
    Error(ErrorInfo),
}

impl ContextValue {
    pub fn scalar<T>(value: T) -> ContextValue
    where
        T: fmt::Display,
    {
        ContextValue::Scalar(value.to_string())
    }

    /// Serializes `value` as JSON. Sequences and maps become
    /// [`ContextValue::Structured`]; anything else is a scalar.
    pub fn structured<T>(value: &T) -> ContextValue
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_string(value) {
            Ok(json) => classify_json(json),
            Err(err) => ContextValue::Scalar(format!("<unserializable: {err}>")),
        }
    }

    pub fn error(err: &(dyn StdError + 'static)) -> ContextValue {
        ContextValue::Error(ErrorInfo::from_error(err))
    }

    fn from_kv(value: &Value<'_>, file: Option<&str>, line: Option<u32>) -> ContextValue {
        if let Some(err) = value.to_borrowed_error() {
            return ContextValue::Error(
                ErrorInfo::from_error(err).at(file.unwrap_or_default(), line.unwrap_or_default()),
            );
        }
        match serde_json::to_string(value) {
            Ok(json) => classify_json(json),
            Err(_) => ContextValue::Scalar(value.to_string()),
        }
    }
}

fn classify_json(json: String) -> ContextValue {
    if json.starts_with('[') || json.starts_with('{') {
        ContextValue::Structured(json)
    } else if json.starts_with('"') {
        match serde_json::from_str::<String>(&json) {
            Ok(text) => ContextValue::Scalar(text),
            Err(_) => ContextValue::Scalar(json),
        }
    } else {
        ContextValue::Scalar(json)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Scalar(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Scalar(value)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ContextValue {
                fn from(value: $ty) -> Self {
                    ContextValue::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<ErrorInfo> for ContextValue {
    fn from(value: ErrorInfo) -> Self {
        ContextValue::Error(value)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => ContextValue::Scalar(text),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                ContextValue::Structured(value.to_string())
            }
            other => ContextValue::Scalar(other.to_string()),
        }
    }
}

/// What the renderer knows about an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    /// One frame or cause per line.
    pub trace: String,
    pub code: String,
    pub file: String,
    pub line: u32,
}

impl ErrorInfo {
    pub fn new<T>(message: T) -> ErrorInfo
    where
        T: Into<String>,
    {
        ErrorInfo {
            message: message.into(),
            trace: String::new(),
            code: "0".to_string(),
            file: String::new(),
            line: 0,
        }
    }

    /// Builds the info from an error and its chain of sources.
    ///
    /// The trace lists each source on its own line, outermost first. An
    /// `io::Error` carrying an OS error number uses it as the code.
    pub fn from_error(err: &(dyn StdError + 'static)) -> ErrorInfo {
        let trace = std::iter::successors(err.source(), |&cause| cause.source())
            .enumerate()
            .map(|(depth, cause)| format!("#{depth} {cause}"))
            .collect::<Vec<_>>()
            .join("\n");
        let code = err
            .downcast_ref::<io::Error>()
            .and_then(io::Error::raw_os_error)
            .unwrap_or(0);
        ErrorInfo {
            message: err.to_string(),
            trace,
            code: code.to_string(),
            file: String::new(),
            line: 0,
        }
    }

    #[must_use]
    pub fn with_trace<T>(mut self, trace: T) -> ErrorInfo
    where
        T: Into<String>,
    {
        self.trace = trace.into();
        self
    }

    #[must_use]
    pub fn with_code<T>(mut self, code: T) -> ErrorInfo
    where
        T: fmt::Display,
    {
        self.code = code.to_string();
        self
    }

    /// Sets where the error was raised.
    #[must_use]
    pub fn at<T>(mut self, file: T, line: u32) -> ErrorInfo
    where
        T: Into<String>,
    {
        self.file = file.into();
        self.line = line;
        self
    }
}

// Visitor collecting the kv pairs of a log record in order.
struct LogVisitor<'r> {
    context: Context,
    file: Option<&'r str>,
    line: Option<u32>,
}

impl<'kvs, 'r> VisitSource<'kvs> for LogVisitor<'r> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), Error> {
        let value = ContextValue::from_kv(&value, self.file, self.line);
        self.context.push(key.as_str(), value);
        Ok(())
    }
}
