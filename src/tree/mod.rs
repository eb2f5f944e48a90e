//! Attribute accumulation and grouping.
//!
//! Data flow for one record:
//! - `frames`: the context chain built by `with_group`/`with_attrs` is
//!   replayed oldest-first into the builder;
//! - `builder`: every attribute is routed into one nested tree, using
//!   `index` to find mount points and `wrap` to build missing groups;
//! - the builder yields the flat top-level attribute list.

pub mod builder;
pub mod frames;
pub mod index;
pub mod wrap;

pub use builder::{AttrBuilder, BuiltAttrs, MountConflict, ReplaceAttr};
pub use frames::{Frame, GroupFrame, apply_groups_or_attrs};
pub use index::{NodeId, PathIndex, PathNode};
pub use wrap::build_groups_around_attr;
