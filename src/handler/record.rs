use crate::attr::{Attr, Level, Source};
use crate::tree::MountConflict;
use chrono::{DateTime, Utc};

/// One log event.
///
/// Records passed to `AttrHandler::handle` carry the attributes of the
/// logging call. Records delivered to the capture callback carry the built
/// attribute list instead: builtins first, then the nested tree of every
/// accumulated and direct attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// `None` leaves the time builtin out.
    pub time: Option<DateTime<Utc>>,
    pub level: Level,
    pub message: String,
    pub source: Option<Source>,
    pub attrs: Vec<Attr>,
    /// Attributes the builder could not mount.
    pub conflicts: Vec<MountConflict>,
}

impl Record {
    pub fn new(
        time: Option<DateTime<Utc>>,
        level: Level,
        message: impl Into<String>,
        source: Option<Source>,
    ) -> Self {
        Self {
            time,
            level,
            message: message.into(),
            source,
            attrs: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.add_attrs(attrs);
        self
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }
}
