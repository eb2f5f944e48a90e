//! Attribute values.
//!
//! A `Value` is one of a fixed set of kinds. Groups carry an ordered list of
//! attributes and lazy values are resolved on demand through [`LogValue`].

use crate::attr::Attr;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on chained `LogValue` resolutions.
const MAX_RESOLVE_DEPTH: usize = 100;

/// A value computed only when a record is built.
pub trait LogValue: fmt::Debug + Send + Sync {
    fn log_value(&self) -> Value;
}

/// Shared handle to a [`LogValue`]. Two handles are equal when they point at
/// the same allocation.
#[derive(Clone)]
pub struct Lazy(Arc<dyn LogValue>);

impl Lazy {
    pub fn new(v: impl LogValue + 'static) -> Self {
        Self(Arc::new(v))
    }

    pub fn log_value(&self) -> Value {
        self.0.log_value()
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lazy({:?})", self.0)
    }
}

impl PartialEq for Lazy {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Caller location attached to a record when `add_source` is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl From<&std::panic::Location<'_>> for Source {
    fn from(loc: &std::panic::Location<'_>) -> Self {
        Self {
            file: loc.file().to_string(),
            line: loc.line(),
            column: loc.column(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Empty,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Duration,
    Time,
    Source,
    Lazy,
    Group,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Empty => "Empty",
            Kind::Bool => "Bool",
            Kind::Int => "Int",
            Kind::Uint => "Uint",
            Kind::Float => "Float",
            Kind::String => "String",
            Kind::Duration => "Duration",
            Kind::Time => "Time",
            Kind::Source => "Source",
            Kind::Lazy => "Lazy",
            Kind::Group => "Group",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Duration(Duration),
    Time(DateTime<Utc>),
    Source(Source),
    Lazy(Lazy),
    Group(Vec<Attr>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Empty => Kind::Empty,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Duration(_) => Kind::Duration,
            Value::Time(_) => Kind::Time,
            Value::Source(_) => Kind::Source,
            Value::Lazy(_) => Kind::Lazy,
            Value::Group(_) => Kind::Group,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    pub fn as_group(&self) -> Option<&[Attr]> {
        match self {
            Value::Group(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Resolve lazy values until a concrete one appears.
    ///
    /// Non-lazy values are returned unchanged. A chain deeper than
    /// `MAX_RESOLVE_DEPTH` stops with a string value naming the last lazy
    /// value seen.
    pub fn resolve(self) -> Value {
        let mut v = self;
        for _ in 0..MAX_RESOLVE_DEPTH {
            match v {
                Value::Lazy(lazy) => v = lazy.log_value(),
                other => return other,
            }
        }
        match v {
            Value::Lazy(lazy) => Value::String(format!(
                "LogValue resolution exceeded {} levels: {:?}",
                MAX_RESOLVE_DEPTH, lazy
            )),
            other => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("<empty>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Source(src) => write!(f, "{}:{}:{}", src.file, src.line, src.column),
            Value::Lazy(lazy) => write!(f, "{:?}", lazy),
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, a) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", a)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<Source> for Value {
    fn from(src: Source) -> Self {
        Value::Source(src)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Constant(i64);

    impl LogValue for Constant {
        fn log_value(&self) -> Value {
            Value::Int(self.0)
        }
    }

    #[derive(Debug)]
    struct Nested(usize);

    impl LogValue for Nested {
        fn log_value(&self) -> Value {
            if self.0 == 0 {
                Value::from("bottom")
            } else {
                Value::Lazy(Lazy::new(Nested(self.0 - 1)))
            }
        }
    }

    #[derive(Debug)]
    struct Forever;

    impl LogValue for Forever {
        fn log_value(&self) -> Value {
            Value::Lazy(Lazy::new(Forever))
        }
    }

    #[test]
    fn resolve_plain_value_is_identity() {
        assert_eq!(Value::from("x").resolve(), Value::from("x"));
        assert_eq!(Value::Empty.resolve(), Value::Empty);
    }

    #[test]
    fn resolve_follows_chains() {
        assert_eq!(Value::Lazy(Lazy::new(Constant(7))).resolve(), Value::Int(7));
        assert_eq!(Value::Lazy(Lazy::new(Nested(5))).resolve(), Value::from("bottom"));
    }

    #[test]
    fn resolve_stops_on_endless_chain() {
        let got = Value::Lazy(Lazy::new(Forever)).resolve();
        match got {
            Value::String(s) => assert!(s.starts_with("LogValue resolution exceeded")),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn lazy_equality_is_identity() {
        let a = Lazy::new(Constant(1));
        let b = Lazy::new(Constant(1));
        assert!(a == a.clone());
        assert!(a != b);
    }

    #[test]
    fn display_group() {
        let v = Value::Group(vec![Attr::string("a", "b"), Attr::int("n", 2)]);
        assert_eq!(v.to_string(), "[a=b n=2]");
    }
}
