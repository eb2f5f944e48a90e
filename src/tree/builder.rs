//! Attribute tree builder.
//!
//! One `AttrBuilder` serves one record. Every `(groups, attr)` pair is
//! resolved, optionally rewritten, and then either appended at the top level
//! or mounted onto the deepest existing group along `groups`. Mounted nodes
//! stay in the arena until `finish`, so later attributes can still reach
//! groups that were emitted earlier in the pass.

use crate::attr::{Attr, Kind, Value};
use crate::tree::index::{NodeId, PathIndex};
use crate::tree::wrap::build_groups_around_attr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Rewrite hook, called with the active group path for every non-group
/// attribute. Returning `Attr::default()` drops the attribute.
pub type ReplaceAttr = Arc<dyn Fn(&[String], Attr) -> Attr + Send + Sync>;

/// An attribute that could not be placed because the node at its mount
/// point is not a group.
#[derive(Debug, Clone, PartialEq)]
pub struct MountConflict {
    /// Path to the mount point.
    pub path: Vec<String>,
    pub mount_key: String,
    pub mount_kind: Kind,
    pub attr_key: String,
}

/// Result of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltAttrs {
    pub attrs: Vec<Attr>,
    pub conflicts: Vec<MountConflict>,
}

pub struct AttrBuilder {
    replace_attr: Option<ReplaceAttr>,
    index: PathIndex,
    results: Vec<NodeId>,
    conflicts: Vec<MountConflict>,
}

impl AttrBuilder {
    pub fn new(replace_attr: Option<ReplaceAttr>) -> Self {
        Self {
            replace_attr,
            index: PathIndex::new(),
            results: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    /// Route one attribute to its place in the tree.
    ///
    /// 1) Resolve lazy values.
    /// 2) Rewrite non-group attributes with the hook, then resolve again.
    /// 3) Drop the zero attribute.
    /// 4) Groups: drop when empty, otherwise route every member under the
    ///    group's key (keyless groups are inlined).
    /// 5) Leaves without groups go to the top level.
    /// 6) Leaves inside groups are mounted onto the deepest existing node
    ///    along `groups`, building whatever part of the path is missing.
    pub fn build_attr(&mut self, groups: &[String], attr: Attr) {
        let mut attr = Attr {
            value: attr.value.resolve(),
            ..attr
        };
        if let Some(replace) = &self.replace_attr {
            if !attr.value.is_group() {
                attr = replace(groups, attr);
                attr.value = attr.value.resolve();
            }
        }

        if attr.is_zero() {
            return;
        }

        let Attr { key, value } = attr;
        let value = match value {
            Value::Group(members) => {
                self.build_group(groups, key, members);
                return;
            }
            leaf => leaf,
        };
        let attr = Attr { key, value };

        if groups.is_empty() {
            self.push_top(attr);
        } else {
            self.mount_nested(groups, attr);
        }
    }

    fn build_group(&mut self, groups: &[String], key: String, members: Vec<Attr>) {
        if members.is_empty() {
            return;
        }

        if key.is_empty() {
            for member in members {
                self.build_attr(groups, member);
            }
            return;
        }

        let mut path = Vec::with_capacity(groups.len() + 1);
        path.extend_from_slice(groups);
        path.push(key);
        for member in members {
            self.build_attr(&path, member);
        }
    }

    fn push_top(&mut self, attr: Attr) {
        let id = self.index.alloc(attr);
        self.index.index_top(id);
        self.results.push(id);
    }

    fn mount_nested(&mut self, groups: &[String], attr: Attr) {
        let (mount, matched) = self.index.find(groups);
        debug!(
            input_groups = ?groups,
            input_attr_key = attr.key.as_str(),
            is_mount_none = mount.is_none(),
            path = ?matched,
            "tree builder: after path lookup"
        );

        let Some(mount) = mount else {
            self.push_top(build_groups_around_attr(groups, attr));
            return;
        };

        // Partial match: build the rest of the path below the mount point.
        let attr = build_groups_around_attr(&groups[matched.len()..], attr);
        let attr_key = attr.key.clone();

        if let Err(mount_kind) = self.index.mount(mount, attr) {
            let conflict = MountConflict {
                path: matched.to_vec(),
                mount_key: self.index.node(mount).key.clone(),
                mount_kind,
                attr_key,
            };
            warn!(
                path = ?conflict.path,
                mount_key = conflict.mount_key.as_str(),
                mount_kind = %conflict.mount_kind,
                attr_key = conflict.attr_key.as_str(),
                "tree builder: cannot mount attr onto a non-group attr; attr skipped"
            );
            self.conflicts.push(conflict);
        }
    }

    /// Materialize the top-level attributes in emission order.
    pub fn finish(mut self) -> BuiltAttrs {
        let results = std::mem::take(&mut self.results);
        let attrs = results.into_iter().map(|id| self.index.take(id)).collect();
        BuiltAttrs {
            attrs,
            conflicts: self.conflicts,
        }
    }
}
