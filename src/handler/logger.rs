use crate::attr::{Attr, Level, Source};
use crate::handler::{AttrHandler, Record};
use chrono::Utc;
use std::panic::Location;
use tracing::error;

/// Front end over an `AttrHandler`, in the shape of a structured logger.
///
/// Records get the current time and the caller location. Disabled levels
/// are skipped before any record is built. Handler failures are reported
/// through `tracing` and otherwise ignored, as a logging call cannot fail.
#[derive(Debug, Clone)]
pub struct Logger {
    handler: AttrHandler,
}

impl Logger {
    pub fn new(handler: AttrHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &AttrHandler {
        &self.handler
    }

    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(self.handler.with_attrs(attrs.into_iter().collect()))
    }

    pub fn with_group(&self, name: impl Into<String>) -> Self {
        Self::new(self.handler.with_group(name))
    }

    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, attrs: impl IntoIterator<Item = Attr>) {
        if !self.handler.enabled(level) {
            return;
        }

        let source = Source::from(Location::caller());
        let record = Record::new(Some(Utc::now()), level, msg, Some(source)).with_attrs(attrs);
        if let Err(err) = self.handler.handle(record) {
            error!(error = %err, level = %level, msg, "logger: handler failed");
        }
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(Level::DEBUG, msg, attrs);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(Level::INFO, msg, attrs);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(Level::WARN, msg, attrs);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(Level::ERROR, msg, attrs);
    }
}
