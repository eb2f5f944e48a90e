use crate::capture::capture_records;
use crate::check::CheckError;
use crate::handler::{AttrHandlerOptions, Logger, Record};
use crate::script::validate::{Step, ValidatedScript};
use anyhow::anyhow;
use tracing::debug;

/// Result of one script check.
#[derive(Debug)]
pub struct CheckOutcome {
    pub label: String,
    pub record: usize,
    /// `CheckError` for check failures; other errors mean the record was
    /// never captured.
    pub result: anyhow::Result<()>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }

    /// The check failure, if the check ran and failed.
    pub fn check_error(&self) -> Option<&CheckError> {
        self.result.as_ref().err()?.downcast_ref::<CheckError>()
    }
}

#[derive(Debug)]
pub struct Replay {
    pub records: Vec<Record>,
    pub outcomes: Vec<CheckOutcome>,
}

impl Replay {
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

impl ValidatedScript {
    /// Run the steps against a fresh handler, then every check against the
    /// record it targets.
    ///
    /// Records below the handler level are never captured, so a check can
    /// target an index past the end; that check fails instead of the replay.
    pub fn replay(&self) -> anyhow::Result<Replay> {
        let opts = AttrHandlerOptions {
            handler: self.options.clone(),
            capture_record: None,
        };

        let (records, result) = capture_records(Some(opts), |handler| {
            let mut logger = Logger::new(handler);
            for step in &self.steps {
                match step {
                    Step::WithAttrs(attrs) => logger = logger.with(attrs.iter().cloned()),
                    Step::WithGroup(name) => logger = logger.with_group(name.clone()),
                    Step::Log { level, msg, attrs } => logger.log(*level, msg, attrs.iter().cloned()),
                }
            }
            Ok(())
        });
        result?;
        debug!(records = records.len(), steps = self.steps.len(), "replay: captured");

        let outcomes = self
            .checks
            .iter()
            .map(|c| {
                let result = match records.get(c.record) {
                    Some(r) => (c.check)(r.attrs()).map_err(anyhow::Error::from),
                    None => Err(anyhow!(
                        "no record at index {} ({} captured)",
                        c.record,
                        records.len()
                    )),
                };
                CheckOutcome {
                    label: c.label.clone(),
                    record: c.record,
                    result,
                }
            })
            .collect();

        Ok(Replay { records, outcomes })
    }
}

#[cfg(test)]
mod tests {
    use crate::attr::Attr;
    use crate::script::Script;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn replay(v: serde_json::Value) -> super::Replay {
        let script: Script = serde_json::from_value(v).unwrap();
        script.validate_and_build().unwrap().replay().unwrap()
    }

    #[test]
    fn context_steps_shape_later_records() {
        let out = replay(json!({
            "handler": {"replace": [{"key": "^time$", "groups": "^$", "drop": true}]},
            "steps": [
                {"with_attrs": {"a": "b"}},
                {"with_group": "G"},
                {"with_attrs": {"c": "d"}},
                {"log": {"msg": "m", "attrs": {"e": "f"}}},
            ],
            "checks": [
                {"record": 0, "check": {"has_attr": {"key": "a", "value": "b"}}},
                {"record": 0, "check": {"in_group": {"name": "G", "checks": [
                    {"has_key": "c"}, {"has_key": "e"}, {"missing_key": "a"},
                ]}}},
            ],
        }));

        assert_eq!(out.records.len(), 1);
        assert_eq!(
            out.records[0].attrs(),
            &[
                Attr::string("level", "INFO"),
                Attr::string("msg", "m"),
                Attr::string("a", "b"),
                Attr::group("G", [Attr::string("c", "d"), Attr::string("e", "f")]),
            ][..]
        );
        assert_eq!(out.failures().count(), 0);
    }

    #[test]
    fn filtered_record_fails_its_check() {
        let out = replay(json!({
            "handler": {"level": "WARN"},
            "steps": [{"log": {"level": "INFO", "msg": "quiet"}}],
            "checks": [{"record": 0, "name": "quiet", "check": {"has_key": "msg"}}],
        }));

        assert!(out.records.is_empty());
        let failed: Vec<_> = out.failures().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].label, "quiet");
        assert!(failed[0].check_error().is_none());
    }

    #[test]
    fn check_failures_keep_group_paths() {
        let out = replay(json!({
            "steps": [
                {"with_group": "G"},
                {"log": {"msg": "m", "attrs": {"H": {"x": 1}}}},
            ],
            "checks": [{"record": 0, "check": {"in_group": {"name": "G", "checks": [
                {"in_group": {"name": "H", "checks": [{"has_key": "y"}]}},
            ]}}}],
        }));

        let failed: Vec<_> = out.failures().collect();
        assert_eq!(failed.len(), 1);
        let err = failed[0].check_error().unwrap();
        let paths: Vec<_> = err.errors().iter().map(|e| e.group_path()).collect();
        assert_eq!(paths, vec![Some(&["G".to_string(), "H".to_string()][..])]);
    }
}
