//! Run code against a fresh handler and collect what it logs.

use crate::Result;
use crate::handler::{AttrHandler, AttrHandlerOptions, CaptureRecord, Record};
use std::sync::{Arc, Mutex, PoisonError};

/// Create a handler from `opts`, pass it to `run` and return every record the
/// handler delivered, together with the result of `run`.
///
/// Records are returned even when `run` fails. A `capture_record` callback in
/// `opts` is still called once per record, after the record is collected.
pub fn capture_records<F>(opts: Option<AttrHandlerOptions>, run: F) -> (Vec<Record>, Result<()>)
where
    F: FnOnce(AttrHandler) -> Result<()>,
{
    let opts = opts.unwrap_or_default();
    let records: Arc<Mutex<Vec<Record>>> = Arc::default();

    let sink = records.clone();
    let user_capture = opts.capture_record.clone();
    let capture: CaptureRecord = Arc::new(move |r: Record| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(r.clone());
        match &user_capture {
            Some(c) => c(r),
            None => Ok(()),
        }
    });

    let handler = AttrHandler::new(Some(AttrHandlerOptions {
        handler: opts.handler,
        capture_record: Some(capture),
    }));

    let result = run(handler);
    let out = std::mem::take(&mut *records.lock().unwrap_or_else(PoisonError::into_inner));
    (out, result)
}
