//! Replay scripts: a JSON description of handler options, logger steps and
//! checks on the records they produce.

pub mod raw;
pub mod replay;
pub mod validate;

pub use raw::{RawCheck, RawHandler, RawLog, RawRecordCheck, RawReplaceRule, RawStep, Script};
pub use replay::{CheckOutcome, Replay};
pub use validate::{RecordCheck, Step, ValidatedScript, json_to_attr, json_to_attrs};

use anyhow::Context;
use std::fs;
use std::path::Path;

/// Read and parse a script file. The result is not validated yet.
pub fn load_script(path: &Path) -> anyhow::Result<Script> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read script file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse script file {}", path.display()))
}
