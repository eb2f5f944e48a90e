//! Handler shell around the tree builder.
//!
//! `AttrHandler` gates records by level, keeps the context accumulated by
//! `with_attrs`/`with_group`, builds the attribute tree of every handled
//! record and hands the result to a capture callback. Nothing is formatted:
//! the callback receives plain Rust values.

pub mod logger;
pub mod record;

pub use logger::Logger;
pub use record::Record;

use crate::Result;
use crate::attr::{Attr, LEVEL_KEY, Level, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use crate::tree::{AttrBuilder, GroupFrame, ReplaceAttr, apply_groups_or_attrs};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives every built record. Calls are serialized by the handler.
pub type CaptureRecord = Arc<dyn Fn(Record) -> Result<()> + Send + Sync>;

#[derive(Clone, Default)]
pub struct HandlerOptions {
    /// Minimum level handled. Defaults to `Level::INFO`.
    pub level: Level,
    /// Add a `source` builtin with the caller location.
    pub add_source: bool,
    pub replace_attr: Option<ReplaceAttr>,
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("replace_attr", &self.replace_attr.is_some())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct AttrHandlerOptions {
    pub handler: HandlerOptions,
    /// Without a callback, `handle` does nothing.
    pub capture_record: Option<CaptureRecord>,
}

impl fmt::Debug for AttrHandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrHandlerOptions")
            .field("handler", &self.handler)
            .field("capture_record", &self.capture_record.is_some())
            .finish()
    }
}

/// Handler that outputs attributes without any formatting.
///
/// Clones and derived handlers share the options and the lock guarding the
/// capture callback; each carries its own context chain.
#[derive(Clone)]
pub struct AttrHandler {
    opts: Arc<AttrHandlerOptions>,
    lock: Arc<Mutex<()>>,
    frames: Option<Arc<GroupFrame>>,
}

impl AttrHandler {
    pub fn new(opts: Option<AttrHandlerOptions>) -> Self {
        Self {
            opts: Arc::new(opts.unwrap_or_default()),
            lock: Arc::new(Mutex::new(())),
            frames: None,
        }
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.opts.handler.level
    }

    /// Build the attributes of `record` and pass the result to the capture
    /// callback, returning the callback's error.
    pub fn handle(&self, record: Record) -> Result<()> {
        let Some(capture) = &self.opts.capture_record else {
            return Ok(());
        };

        let out = self.build_record(record);

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        capture(out)
    }

    /// Derive a handler whose records also carry `attrs`, placed under the
    /// groups opened so far.
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        if attrs.is_empty() {
            return self.clone();
        }
        Self {
            frames: Some(GroupFrame::attrs(attrs, self.frames.clone())),
            ..self.clone()
        }
    }

    /// Derive a handler that places every later attribute inside `name`.
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }
        Self {
            frames: Some(GroupFrame::group(name, self.frames.clone())),
            ..self.clone()
        }
    }

    fn build_record(&self, record: Record) -> Record {
        let Record {
            time,
            level,
            message,
            source,
            attrs,
            ..
        } = record;
        let handler_opts = &self.opts.handler;
        let mut ab = AttrBuilder::new(handler_opts.replace_attr.clone());

        // 1) Builtins, in their fixed order.
        if let Some(t) = time {
            ab.build_attr(&[], Attr::time(TIME_KEY, t));
        }
        ab.build_attr(&[], Attr::string(LEVEL_KEY, level.to_string()));
        if handler_opts.add_source {
            ab.build_attr(&[], Attr::new(SOURCE_KEY, source.clone().unwrap_or_default()));
        }
        ab.build_attr(&[], Attr::string(MESSAGE_KEY, message.clone()));

        // 2) Context accumulated through with_attrs/with_group.
        let groups = apply_groups_or_attrs(self.frames.as_deref(), |groups, a| {
            ab.build_attr(groups, a)
        });

        // 3) Attributes of the logging call, inside every accumulated group.
        for a in attrs {
            ab.build_attr(&groups, a);
        }

        let built = ab.finish();
        Record {
            time,
            level,
            message,
            source,
            attrs: built.attrs,
            conflicts: built.conflicts,
        }
    }
}

impl fmt::Debug for AttrHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrHandler")
            .field("opts", &self.opts)
            .field("frames", &self.frames)
            .finish()
    }
}
