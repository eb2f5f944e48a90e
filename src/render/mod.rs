//! Machine-readable views of built records.

pub mod json;

pub use json::{attrs_to_json, value_to_json};
