use super::json::JsonCollector;
use super::markdown::MarkdownCollector;
use crate::error::{Error, Result};
use crate::utils::changelog::HeadingKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// assembles the values projected by the query engine into the final result
pub trait ResultSink {
    /// a heading matched by the query is first met
    fn open(&mut self, kind: HeadingKind);
    /// all of the heading's children have been visited
    fn close(&mut self, kind: HeadingKind);
    /// the query produces a collection of results
    fn set_collection(&mut self);
    fn set(&mut self, value: &str);
    fn set_field(&mut self, name: &str, value: &str);
    /// declare `name` as an array field collecting the values of the children
    fn array(&mut self, name: &str);
    fn result(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "md")]
    Markdown,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }

    /// a fresh, empty sink for this format
    pub fn sink(&self) -> Box<dyn ResultSink> {
        match self {
            OutputFormat::Json => Box::new(JsonCollector::default()),
            OutputFormat::Markdown => Box::new(MarkdownCollector::default()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "md" => Ok(OutputFormat::Markdown),
            _ => Err(Error::OutputFormatError {
                name: s.to_string(),
            }),
        }
    }
}
