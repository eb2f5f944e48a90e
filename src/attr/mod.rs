//! Attribute model: a key plus a typed value, where the value may itself be an
//! ordered group of attributes.

pub mod level;
pub mod value;

pub use level::Level;
pub use value::{Kind, Lazy, LogValue, Source, Value};

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Keys of the builtin record fields.
pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const SOURCE_KEY: &str = "source";
pub const MESSAGE_KEY: &str = "msg";

/// A key/value pair. `Attr::default()` is the zero attribute, which is
/// dropped wherever it is met.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, v: impl Into<String>) -> Self {
        Self::new(key, Value::String(v.into()))
    }

    pub fn int(key: impl Into<String>, v: i64) -> Self {
        Self::new(key, Value::Int(v))
    }

    pub fn uint(key: impl Into<String>, v: u64) -> Self {
        Self::new(key, Value::Uint(v))
    }

    pub fn float(key: impl Into<String>, v: f64) -> Self {
        Self::new(key, Value::Float(v))
    }

    pub fn bool(key: impl Into<String>, v: bool) -> Self {
        Self::new(key, Value::Bool(v))
    }

    pub fn duration(key: impl Into<String>, v: Duration) -> Self {
        Self::new(key, Value::Duration(v))
    }

    pub fn time(key: impl Into<String>, v: DateTime<Utc>) -> Self {
        Self::new(key, Value::Time(v))
    }

    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, Value::Group(attrs.into_iter().collect()))
    }

    pub fn lazy(key: impl Into<String>, v: impl LogValue + 'static) -> Self {
        Self::new(key, Value::Lazy(Lazy::new(v)))
    }

    /// Empty key and empty value.
    pub fn is_zero(&self) -> bool {
        self.key.is_empty() && matches!(self.value, Value::Empty)
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
