// query result output formats

pub mod format;
pub mod json;
pub mod markdown;

pub use format::{OutputFormat, ResultSink};
pub use json::JsonCollector;
pub use markdown::MarkdownCollector;
