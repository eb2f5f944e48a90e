//! Turn a raw script into handler options, replay steps and compiled checks.
//!
//! We compile every pattern, parse every level, convert JSON attribute values
//! and make sure each check points at a record the steps can produce, so a
//! replay never fails on bad input halfway through.

use crate::attr::{Attr, Level, Value};
use crate::check::{self, Check};
use crate::handler::HandlerOptions;
use crate::script::raw::{RawCheck, RawLog, RawReplaceRule, RawStep, Script};
use crate::tree::ReplaceAttr;
use anyhow::{Context, bail};
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// One replay step, in script order.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    WithAttrs(Vec<Attr>),
    WithGroup(String),
    Log {
        level: Level,
        msg: String,
        attrs: Vec<Attr>,
    },
}

pub struct RecordCheck {
    pub label: String,
    /// Index into the captured records.
    pub record: usize,
    pub check: Check,
}

pub struct ValidatedScript {
    pub options: HandlerOptions,
    pub steps: Vec<Step>,
    pub checks: Vec<RecordCheck>,
}

#[derive(Debug, Clone)]
struct ReplaceRule {
    key: Regex,
    groups: Option<Regex>,
    action: ReplaceAction,
}

#[derive(Debug, Clone)]
enum ReplaceAction {
    Rename(String),
    Drop,
}

impl Script {
    pub fn validate_and_build(&self) -> anyhow::Result<ValidatedScript> {
        let level = match &self.handler.level {
            Some(s) => s.parse::<Level>()?,
            None => Level::default(),
        };

        let mut rules = Vec::with_capacity(self.handler.replace.len());
        for (i, raw) in self.handler.replace.iter().enumerate() {
            rules.push(compile_rule(raw).with_context(|| format!("replace rule #{i}"))?);
        }

        let mut steps = Vec::with_capacity(self.steps.len());
        let mut log_steps = 0usize;
        for (i, raw) in self.steps.iter().enumerate() {
            let step = build_step(raw).with_context(|| format!("step #{i}"))?;
            if matches!(step, Step::Log { .. }) {
                log_steps += 1;
            }
            steps.push(step);
        }

        let mut checks = Vec::with_capacity(self.checks.len());
        for (i, raw) in self.checks.iter().enumerate() {
            if raw.record >= log_steps {
                bail!(
                    "check #{} targets record {}, but the script logs only {} record(s)",
                    i,
                    raw.record,
                    log_steps
                );
            }
            let check = build_check(&raw.check).with_context(|| format!("check #{i}"))?;
            checks.push(RecordCheck {
                label: raw
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("check #{i}")),
                record: raw.record,
                check,
            });
        }

        Ok(ValidatedScript {
            options: HandlerOptions {
                level,
                add_source: self.handler.add_source,
                replace_attr: replace_hook(rules),
            },
            steps,
            checks,
        })
    }
}

fn compile_rule(raw: &RawReplaceRule) -> anyhow::Result<ReplaceRule> {
    let action = match (&raw.rename, raw.drop) {
        (Some(to), false) => {
            if to.is_empty() {
                bail!("rename target must not be empty; use \"drop\" to remove attributes");
            }
            ReplaceAction::Rename(to.clone())
        }
        (None, true) => ReplaceAction::Drop,
        (Some(_), true) => bail!("rule for {:?} sets both rename and drop", raw.key),
        (None, false) => bail!("rule for {:?} sets neither rename nor drop", raw.key),
    };

    let key = Regex::new(&raw.key).with_context(|| format!("bad key pattern {:?}", raw.key))?;
    let groups = match &raw.groups {
        Some(p) => Some(Regex::new(p).with_context(|| format!("bad groups pattern {:?}", p))?),
        None => None,
    };

    Ok(ReplaceRule { key, groups, action })
}

/// The first rule matching both key and group path decides; unmatched
/// attributes pass through unchanged.
fn replace_hook(rules: Vec<ReplaceRule>) -> Option<ReplaceAttr> {
    if rules.is_empty() {
        return None;
    }

    Some(Arc::new(move |groups: &[String], attr: Attr| {
        let path = groups.join(".");
        let rule = rules.iter().find(|r| {
            r.key.is_match(&attr.key) && r.groups.as_ref().is_none_or(|g| g.is_match(&path))
        });
        match rule.map(|r| &r.action) {
            Some(ReplaceAction::Rename(to)) => Attr {
                key: to.clone(),
                ..attr
            },
            Some(ReplaceAction::Drop) => Attr::default(),
            None => attr,
        }
    }))
}

fn build_step(raw: &RawStep) -> anyhow::Result<Step> {
    Ok(match raw {
        RawStep::WithAttrs(map) => Step::WithAttrs(json_to_attrs(map)?),
        RawStep::WithGroup(name) => Step::WithGroup(name.clone()),
        RawStep::Log(RawLog { level, msg, attrs }) => Step::Log {
            level: match level {
                Some(s) => s.parse()?,
                None => Level::INFO,
            },
            msg: msg.clone(),
            attrs: json_to_attrs(attrs)?,
        },
    })
}

fn build_check(raw: &RawCheck) -> anyhow::Result<Check> {
    Ok(match raw {
        RawCheck::HasKey(key) => check::has_key(key.clone()),
        RawCheck::MissingKey(key) => check::missing_key(key.clone()),
        RawCheck::HasAttr { key, value } => check::has_attr(json_to_attr(key, value)?),
        RawCheck::HasMatch { key } => {
            let re = Regex::new(key).with_context(|| format!("bad key pattern {:?}", key))?;
            check::has_match(move |a: &Attr| re.is_match(&a.key))
        }
        RawCheck::InGroup { name, checks } => {
            if name.is_empty() {
                bail!("in_group needs a group name");
            }
            let sub = checks
                .iter()
                .map(build_check)
                .collect::<anyhow::Result<Vec<_>>>()?;
            check::in_group(name.clone(), sub)
        }
    })
}

/// Convert a JSON object to attributes, keeping document order.
pub fn json_to_attrs(map: &Map<String, JsonValue>) -> anyhow::Result<Vec<Attr>> {
    map.iter().map(|(k, v)| json_to_attr(k, v)).collect()
}

/// Objects become groups. Integers keep their sign class: anything fitting
/// `i64` is `Int`, larger values `Uint`.
pub fn json_to_attr(key: &str, value: &JsonValue) -> anyhow::Result<Attr> {
    let value = match value {
        JsonValue::Null => Value::Empty,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::Uint(u)
            } else if let Some(x) = n.as_f64() {
                Value::Float(x)
            } else {
                bail!("attr {:?}: number {} is out of range", key, n);
            }
        }
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Object(map) => Value::Group(json_to_attrs(map)?),
        JsonValue::Array(_) => bail!("attr {:?}: arrays are not supported", key),
    };
    Ok(Attr::new(key, value))
}
