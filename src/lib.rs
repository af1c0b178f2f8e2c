pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog::{
    Change, ChangeItem, ChangeKind, ChangeKindEntry, ChangeMap, Changelog, Heading, HeadingKind,
    HeadingsFactory, Introduction, Listener, Release, ReleaseStatus, TracingListener,
    parse_heading,
};
pub use utils::changelog_checker::ChangelogChecker;
pub use utils::config::ClqConfig;
pub use utils::markdown::{DocumentHandler, walk};
pub use utils::output::{JsonCollector, MarkdownCollector, OutputFormat, ResultSink};
pub use utils::query::{QueryEngine, Selector};
pub use utils::semver_ops::{Increment, next_version};
pub use utils::validator::{Validator, ValidatorOptions};
