//! Replay script (script.json) input shapes.
//!
//! JSON shape:
//! {
//!   "handler": {
//!     "level": "INFO",                          // optional, default INFO
//!     "add_source": false,                      // optional
//!     "replace": [                              // optional, first match wins
//!       { "key": "^time$", "drop": true },
//!       { "key": "^level$", "groups": "", "rename": "severity" }
//!     ]
//!   },
//!   "steps": [
//!     { "with_attrs": { "a": "b" } },
//!     { "with_group": "G" },
//!     { "log": { "level": "WARN", "msg": "hello", "attrs": { "e": "f" } } }
//!   ],
//!   "checks": [
//!     { "record": 0, "name": "e in G",
//!       "check": { "in_group": { "name": "G", "checks": [ { "has_key": "e" } ] } } }
//!   ]
//! }
//!
//! Attribute values are JSON scalars or objects; an object is a group whose
//! members keep document order.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub handler: RawHandler,

    #[serde(default)]
    pub steps: Vec<RawStep>,

    #[serde(default)]
    pub checks: Vec<RawRecordCheck>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHandler {
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub add_source: bool,

    #[serde(default)]
    pub replace: Vec<RawReplaceRule>,
}

/// Rewrite rule applied by the handler's replace hook.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReplaceRule {
    /// Pattern matched against the attribute key.
    pub key: String,

    /// Pattern matched against the dotted group path (`G.H`, or `""` at the
    /// top level). Any path when absent.
    #[serde(default)]
    pub groups: Option<String>,

    #[serde(default)]
    pub rename: Option<String>,

    #[serde(default)]
    pub drop: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawStep {
    WithGroup(String),
    WithAttrs(Map<String, JsonValue>),
    Log(RawLog),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLog {
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub msg: String,

    #[serde(default)]
    pub attrs: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRecordCheck {
    /// Index into the captured records.
    pub record: usize,

    #[serde(default)]
    pub name: Option<String>,

    pub check: RawCheck,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawCheck {
    HasKey(String),
    MissingKey(String),
    HasAttr {
        key: String,
        value: JsonValue,
    },
    /// Exactly one attribute whose key matches the pattern.
    HasMatch {
        key: String,
    },
    InGroup {
        name: String,
        #[serde(default)]
        checks: Vec<RawCheck>,
    },
}
