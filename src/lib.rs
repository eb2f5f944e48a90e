//! Test harness for structured logging handlers.
//!
//! `AttrHandler` turns log records into plain attribute trees: context added
//! with `with_attrs`/`with_group` and the attributes of each call are merged
//! into one nested group structure per record. The `check` module verifies
//! such trees, reporting every failure with the group path it occurred in.
//!
//! ```
//! use attrlog::attr::Attr;
//! use attrlog::capture::capture_records;
//! use attrlog::check::{has_attr, in_group};
//! use attrlog::handler::Logger;
//!
//! let (records, result) = capture_records(None, |h| {
//!     Logger::new(h).with_group("G").info("hello", [Attr::int("n", 1)]);
//!     Ok(())
//! });
//! assert!(result.is_ok());
//! let check = in_group("G", [has_attr(Attr::int("n", 1))]);
//! assert!(check(records[0].attrs()).is_ok());
//! ```

pub mod attr;
pub mod capture;
pub mod check;
pub mod handler;
pub mod render;
pub mod script;
pub mod tree;

pub type Result<T> = anyhow::Result<T>;

pub use attr::{Attr, Level, Value};
pub use capture::capture_records;
pub use check::{Check, CheckError};
pub use handler::{AttrHandler, AttrHandlerOptions, HandlerOptions, Logger, Record};
