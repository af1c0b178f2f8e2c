// changelog heading model and traversal state

pub mod change_kind;
pub mod parser;
pub mod tracker;
pub mod types;

pub use change_kind::{ChangeKind, ChangeKindEntry, ChangeMap};
pub use parser::{HeadingsFactory, parse_heading};
pub use tracker::{Changelog, Listener, TracingListener};
pub use types::{
    Change, ChangeItem, Heading, HeadingKind, Introduction, Release, ReleaseStatus,
};
