use crate::attr::{Attr, Kind};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected number of matches; got {got}, expected {expected}")]
pub struct CountMismatch {
    pub got: usize,
    pub expected: usize,
}

/// The single attribute with the wanted key has a different value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMismatch {
    pub got: Attr,
    pub want: Attr,
}

impl fmt::Display for ValueMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attributes not equal\ngot_key {:?}, want_key {:?}\ngot_val_kind {:?}, want_val_kind {:?}\ngot_val {} want_val {}",
            self.got.key,
            self.want.key,
            self.got.value.kind().to_string(),
            self.want.value.kind().to_string(),
            self.got.value,
            self.want.value,
        )
    }
}

impl StdError for ValueMismatch {}

/// An error raised inside one or more groups, with the names of those groups
/// from outermost to innermost.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPathError {
    pub source: Box<CheckError>,
    pub group_path: Vec<String>,
}

impl GroupPathError {
    pub fn group_path(&self) -> &[String] {
        &self.group_path
    }
}

impl fmt::Display for GroupPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; group path {}", self.source, self.group_path.join("."))
    }
}

impl StdError for GroupPathError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Every failure of the checks run inside one group. Nested aggregates are
/// flattened, so members are never `Joined` themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedErrors {
    pub errors: Vec<CheckError>,
}

impl fmt::Display for JoinedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl StdError for JoinedErrors {}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error("did not find expected key {0}")]
    MissingKey(String),

    #[error("unexpected key {0}")]
    UnexpectedKey(String),

    #[error("looking for attr with key {key}: {count}")]
    AttrCount { key: String, count: CountMismatch },

    #[error("{0}")]
    NotEqual(ValueMismatch),

    #[error("{0}")]
    Count(#[from] CountMismatch),

    #[error("looking for group attr with name {name}: {count}")]
    GroupCount { name: String, count: CountMismatch },

    #[error("wrong kind ({kind}) for item with key {key}, expected {}", Kind::Group)]
    NotAGroup { key: String, kind: Kind },

    #[error("{0}")]
    WithGroupPath(GroupPathError),

    #[error("{0}")]
    Joined(JoinedErrors),
}

impl CheckError {
    /// Members of an aggregate. Any other error is its own only member.
    pub fn errors(&self) -> &[CheckError] {
        match self {
            CheckError::Joined(joined) => &joined.errors,
            other => std::slice::from_ref(other),
        }
    }

    /// Groups traversed to reach this error, outermost first.
    pub fn group_path(&self) -> Option<&[String]> {
        match self {
            CheckError::WithGroupPath(err) => Some(err.group_path()),
            _ => None,
        }
    }

    pub fn is_joined(&self) -> bool {
        matches!(self, CheckError::Joined(_))
    }
}

/// Tag `err` with `group`. Aggregates are flattened and each member is
/// tagged; errors already tagged by an inner group get `group` prepended.
pub(crate) fn with_group_path(err: CheckError, group: &str) -> Vec<CheckError> {
    match err {
        CheckError::Joined(joined) => joined
            .errors
            .into_iter()
            .flat_map(|e| with_group_path(e, group))
            .collect(),
        CheckError::WithGroupPath(mut tagged) => {
            tagged.group_path.insert(0, group.to_string());
            vec![CheckError::WithGroupPath(tagged)]
        }
        other => vec![CheckError::WithGroupPath(GroupPathError {
            source: Box::new(other),
            group_path: vec![group.to_string()],
        })],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tagging_prepends_outer_groups() {
        let inner = with_group_path(CheckError::MissingKey("k".to_string()), "H");
        let outer = with_group_path(CheckError::Joined(JoinedErrors { errors: inner }), "G");

        assert_eq!(outer.len(), 1);
        assert_eq!(outer[0].group_path().unwrap(), ["G", "H"]);
        assert_eq!(outer[0].to_string(), "did not find expected key k; group path G.H");
    }

    #[test]
    fn errors_of_plain_error_is_itself() {
        let err = CheckError::UnexpectedKey("z".to_string());
        assert_eq!(err.errors(), [err.clone()]);
        assert_eq!(err.group_path(), None);
    }
}
