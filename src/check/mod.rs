//! Checks over a list of attributes.
//!
//! A `Check` is a plain function over `&[Attr]`, so checks compose freely.
//! `in_group` runs checks on the members of one group and tags every failure
//! with the names of the groups it went through.

pub mod error;

pub use error::{CheckError, CountMismatch, GroupPathError, JoinedErrors, ValueMismatch};

use crate::attr::Attr;
use error::with_group_path;

pub type Check = Box<dyn Fn(&[Attr]) -> Result<(), CheckError> + Send + Sync>;

/// At least one attribute has `key`. Use this when the value does not matter.
pub fn has_key(key: impl Into<String>) -> Check {
    let key = key.into();
    Box::new(move |attrs: &[Attr]| {
        if collect_matching(attrs, |a| a.key == key).is_empty() {
            return Err(CheckError::MissingKey(key.clone()));
        }
        Ok(())
    })
}

/// No attribute has `key`.
pub fn missing_key(key: impl Into<String>) -> Check {
    let key = key.into();
    Box::new(move |attrs: &[Attr]| {
        if !collect_matching(attrs, |a| a.key == key).is_empty() {
            return Err(CheckError::UnexpectedKey(key.clone()));
        }
        Ok(())
    })
}

/// Exactly one attribute has the key of `want`, and it equals `want`.
pub fn has_attr(want: Attr) -> Check {
    Box::new(move |attrs: &[Attr]| {
        let got = collect_n_matching(attrs, 1, |a| a.key == want.key).map_err(|count| {
            CheckError::AttrCount {
                key: want.key.clone(),
                count,
            }
        })?;

        if got[0] != &want {
            return Err(CheckError::NotEqual(ValueMismatch {
                got: got[0].clone(),
                want: want.clone(),
            }));
        }
        Ok(())
    })
}

/// Exactly one attribute satisfies `matches`.
pub fn has_match<F>(matches: F) -> Check
where
    F: Fn(&Attr) -> bool + Send + Sync + 'static,
{
    Box::new(move |attrs: &[Attr]| {
        collect_n_matching(attrs, 1, &matches)?;
        Ok(())
    })
}

/// Find exactly one group attribute named `name` and run `checks` on its
/// members. The group must exist even when `checks` is empty.
///
/// Failures come back as one `CheckError::Joined`. Each member is tagged
/// with the group path leading to it; failing to find the group itself is a
/// one-member aggregate without a path.
pub fn in_group(name: impl Into<String>, checks: impl IntoIterator<Item = Check>) -> Check {
    let name = name.into();
    let checks: Vec<Check> = checks.into_iter().collect();

    Box::new(move |attrs: &[Attr]| {
        let got = collect_n_matching(attrs, 1, |a| a.key == name).map_err(|count| {
            joined(vec![CheckError::GroupCount {
                name: name.clone(),
                count,
            }])
        })?;

        let Some(members) = got[0].value.as_group() else {
            return Err(joined(vec![CheckError::NotAGroup {
                key: name.clone(),
                kind: got[0].value.kind(),
            }]));
        };

        let mut errs = Vec::new();
        for check in &checks {
            if let Err(err) = check(members) {
                errs.extend(with_group_path(err, &name));
            }
        }

        if errs.is_empty() {
            Ok(())
        } else {
            Err(joined(errs))
        }
    })
}

fn joined(errors: Vec<CheckError>) -> CheckError {
    CheckError::Joined(JoinedErrors { errors })
}

fn collect_matching<'a, F>(attrs: &'a [Attr], matches: F) -> Vec<&'a Attr>
where
    F: Fn(&Attr) -> bool,
{
    attrs.iter().filter(|a| matches(a)).collect()
}

fn collect_n_matching<'a, F>(attrs: &'a [Attr], n: usize, matches: F) -> Result<Vec<&'a Attr>, CountMismatch>
where
    F: Fn(&Attr) -> bool,
{
    let out = collect_matching(attrs, matches);
    if out.len() != n {
        return Err(CountMismatch {
            got: out.len(),
            expected: n,
        });
    }
    Ok(out)
}
