//! Path index over the attributes of one build pass.
//!
//! Nodes live in an arena and refer to each other by `NodeId`. The top-level
//! map and the `children` map of every group node index nodes by key, so a
//! group path can be walked without scanning member lists. Group members are
//! kept separately, in emission order, and only turned back into `Attr`
//! values when the pass finishes.

use crate::attr::{Attr, Kind, Value};
use std::collections::HashMap;
use tracing::debug;

/// Position of a node in the arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub enum NodeValue {
    Leaf(Value),
    Group {
        /// Emission order.
        members: Vec<NodeId>,
        /// Last member indexed under each key.
        children: HashMap<String, NodeId>,
    },
}

/// One location in the output tree.
#[derive(Debug, Clone)]
pub struct PathNode {
    pub key: String,
    pub value: NodeValue,
}

impl PathNode {
    pub fn kind(&self) -> Kind {
        match &self.value {
            NodeValue::Leaf(v) => v.kind(),
            NodeValue::Group { .. } => Kind::Group,
        }
    }

    /// `None` for leaves: a path cannot continue through them.
    pub fn children(&self) -> Option<&HashMap<String, NodeId>> {
        match &self.value {
            NodeValue::Leaf(_) => None,
            NodeValue::Group { children, .. } => Some(children),
        }
    }
}

#[derive(Debug, Default)]
pub struct PathIndex {
    nodes: Vec<PathNode>,
    top: HashMap<String, NodeId>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id]
    }

    /// Store `attr` in the arena and return its id. Group members are stored
    /// too, each indexed in its parent under its key.
    pub fn alloc(&mut self, attr: Attr) -> NodeId {
        let Attr { key, value } = attr;
        let value = match value {
            Value::Group(attrs) => {
                let mut members = Vec::with_capacity(attrs.len());
                let mut children = HashMap::with_capacity(attrs.len());
                for a in attrs {
                    let id = self.alloc(a);
                    children.insert(self.nodes[id].key.clone(), id);
                    members.push(id);
                }
                NodeValue::Group { members, children }
            }
            leaf => NodeValue::Leaf(leaf),
        };
        self.nodes.push(PathNode { key, value });
        self.nodes.len() - 1
    }

    /// Index `id` at the top level, replacing any node with the same key.
    pub fn index_top(&mut self, id: NodeId) {
        self.top.insert(self.nodes[id].key.clone(), id);
    }

    /// Find the deepest existing node along `path`.
    ///
    /// Returns the node and the prefix of `path` walked to reach it:
    /// - every segment matched: the terminal node and all of `path`;
    /// - some prefix matched: the deepest matched node and that prefix, which
    ///   is shorter than `path`. This also happens when a matched node is a
    ///   leaf and the path continues;
    /// - the first segment is unknown, or `path` is empty: `None` and an empty
    ///   prefix. To the caller this means "insert at the top level".
    pub fn find<'p>(&self, path: &'p [String]) -> (Option<NodeId>, &'p [String]) {
        let mut curr = &self.top;
        let mut found: Option<NodeId> = None;

        for (depth, key) in path.iter().enumerate() {
            let Some(&id) = curr.get(key) else {
                match found {
                    None => debug!(key = key.as_str(), depth, "path index: key not found"),
                    Some(parent) => debug!(
                        key = key.as_str(),
                        depth,
                        parent_key = self.nodes[parent].key.as_str(),
                        "path index: key not found; returning parent"
                    ),
                }
                return (found, &path[..depth]);
            };

            found = Some(id);
            if depth == path.len() - 1 {
                return (found, path);
            }

            match self.nodes[id].children() {
                Some(children) => curr = children,
                None => {
                    debug!(
                        stopped_at_key = key.as_str(),
                        "path index: path continues past a leaf"
                    );
                    return (found, &path[..=depth]);
                }
            }
        }

        (None, &path[..0])
    }

    /// Append `attr` as the last member of the group at `dest` and index it
    /// there. Fails with the kind of `dest` when it is not a group; nothing
    /// is stored in that case.
    pub fn mount(&mut self, dest: NodeId, attr: Attr) -> Result<NodeId, Kind> {
        if !matches!(self.nodes[dest].value, NodeValue::Group { .. }) {
            return Err(self.nodes[dest].kind());
        }

        let id = self.alloc(attr);
        let key = self.nodes[id].key.clone();
        if let NodeValue::Group { members, children } = &mut self.nodes[dest].value {
            members.push(id);
            children.insert(key, id);
        }
        Ok(id)
    }

    /// Move the subtree rooted at `id` out of the arena as an `Attr`.
    pub fn take(&mut self, id: NodeId) -> Attr {
        let value = std::mem::replace(&mut self.nodes[id].value, NodeValue::Leaf(Value::Empty));
        let key = std::mem::take(&mut self.nodes[id].key);
        let value = match value {
            NodeValue::Leaf(v) => v,
            NodeValue::Group { members, .. } => {
                Value::Group(members.into_iter().map(|m| self.take(m)).collect())
            }
        };
        Attr { key, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::MESSAGE_KEY;
    use pretty_assertions::assert_eq;

    fn path(p: &[&str]) -> Vec<String> {
        p.iter().map(|s| s.to_string()).collect()
    }

    /// msg="message", G={ c="charlie", H="Hotel" }
    fn sample() -> (PathIndex, NodeId, NodeId, NodeId) {
        let mut index = PathIndex::new();
        let msg = index.alloc(Attr::string(MESSAGE_KEY, "message"));
        index.index_top(msg);
        let g = index.alloc(Attr::group(
            "G",
            [Attr::string("c", "charlie"), Attr::string("H", "Hotel")],
        ));
        index.index_top(g);
        let h = index.node(g).children().unwrap()["H"];
        (index, msg, g, h)
    }

    #[test]
    fn find_cases() {
        let (index, msg, g, h) = sample();

        let cases: Vec<(&str, Vec<String>, Option<NodeId>, Vec<String>)> = vec![
            ("top-level found", path(&[MESSAGE_KEY]), Some(msg), path(&[MESSAGE_KEY])),
            ("top-level not found", path(&["foo"]), None, path(&[])),
            ("sub-level full match", path(&["G"]), Some(g), path(&["G"])),
            ("sub-level no match", path(&["G", "sibling"]), Some(g), path(&["G"])),
            ("sub-level full match deep", path(&["G", "H"]), Some(h), path(&["G", "H"])),
            ("sub-level path too long", path(&["G", "H", "I"]), Some(h), path(&["G", "H"])),
            ("reaches past a top-level leaf", path(&[MESSAGE_KEY, "x"]), Some(msg), path(&[MESSAGE_KEY])),
            ("empty", path(&[]), None, path(&[])),
        ];

        for (name, input, exp_node, exp_path) in cases {
            let (node, matched) = index.find(&input);
            assert_eq!(node, exp_node, "{}: node", name);
            assert_eq!(matched, exp_path.as_slice(), "{}: path", name);
        }
    }

    #[test]
    fn mount_appends_and_indexes() {
        let (mut index, _, g, _) = sample();
        let id = index.mount(g, Attr::string("d", "delta")).unwrap();

        assert_eq!(index.node(g).children().unwrap()["d"], id);
        assert_eq!(index.find(&path(&["G", "d"])), (Some(id), path(&["G", "d"]).as_slice()));
        assert_eq!(
            index.take(g),
            Attr::group(
                "G",
                [
                    Attr::string("c", "charlie"),
                    Attr::string("H", "Hotel"),
                    Attr::string("d", "delta"),
                ]
            )
        );
    }

    #[test]
    fn mount_onto_leaf_is_refused() {
        let (mut index, msg, _, _) = sample();
        assert_eq!(index.mount(msg, Attr::string("x", "y")), Err(Kind::String));
        assert_eq!(index.take(msg), Attr::string(MESSAGE_KEY, "message"));
    }

    #[test]
    fn alloc_indexes_nested_groups() {
        let mut index = PathIndex::new();
        let g = index.alloc(Attr::group("G", [Attr::group("H", [Attr::int("n", 1)])]));
        index.index_top(g);

        let p = path(&["G", "H", "n"]);
        let (node, matched) = index.find(&p);
        assert_eq!(matched.len(), 3);
        assert_eq!(index.node(node.unwrap()).key, "n");
    }
}
