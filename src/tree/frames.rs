//! Accumulated logging context.
//!
//! Every `with_group`/`with_attrs` derivation prepends one immutable frame to
//! a shared chain, so derived contexts never touch their predecessor. The
//! chain is linked newest-first and replayed oldest-first.

use crate::attr::Attr;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Frame {
    /// Opens a group for everything derived after it.
    Group(String),
    /// Attributes captured at one derivation step.
    Attrs(Vec<Attr>),
}

#[derive(Debug)]
pub struct GroupFrame {
    pub frame: Frame,
    pub next: Option<Arc<GroupFrame>>,
}

impl GroupFrame {
    pub fn group(name: impl Into<String>, next: Option<Arc<GroupFrame>>) -> Arc<Self> {
        Arc::new(Self {
            frame: Frame::Group(name.into()),
            next,
        })
    }

    pub fn attrs(attrs: Vec<Attr>, next: Option<Arc<GroupFrame>>) -> Arc<Self> {
        Arc::new(Self {
            frame: Frame::Attrs(attrs),
            next,
        })
    }
}

/// Replay the chain oldest-first, calling `visit` once per attribute with the
/// groups opened before it. Returns every group name in the chain, in order.
pub fn apply_groups_or_attrs<F>(frames: Option<&GroupFrame>, mut visit: F) -> Vec<String>
where
    F: FnMut(&[String], Attr),
{
    fn replay<F>(frame: Option<&GroupFrame>, groups: &mut Vec<String>, visit: &mut F)
    where
        F: FnMut(&[String], Attr),
    {
        let Some(frame) = frame else {
            return;
        };
        replay(frame.next.as_deref(), groups, visit);

        match &frame.frame {
            Frame::Group(name) => {
                if !name.is_empty() {
                    groups.push(name.clone());
                }
            }
            Frame::Attrs(attrs) => {
                for a in attrs {
                    visit(groups, a.clone());
                }
            }
        }
    }

    let mut groups = Vec::new();
    replay(frames, &mut groups, &mut visit);
    groups
}
