use crate::utils::changelog::Heading;
use crate::utils::output::ResultSink;
use std::fmt;

/// a value that can be read from a heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Title,
    Date,
    Label,
    Status,
    Version,
}

impl Attribute {
    /// the attribute's value for `heading`, none when the heading does not
    /// carry it (an unreleased release has no version, a change has no date)
    pub fn value(self, heading: &Heading) -> Option<String> {
        match self {
            Attribute::Title => Some(heading.display_title()),
            Attribute::Date => heading.as_release().and_then(|r| r.date_string()),
            Attribute::Label => heading.as_release().and_then(|r| r.label.clone()),
            Attribute::Status => heading.as_release().map(|r| r.status().to_string()),
            Attribute::Version => heading.as_release().and_then(|r| r.version_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Title => "title",
            Attribute::Date => "date",
            Attribute::Label => "label",
            Attribute::Status => "status",
            Attribute::Version => "version",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// a single write to the result sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// the heading's value is the attribute itself
    Set(Attribute),
    /// the heading's value is an object, with the attribute stored under its name
    Field(Attribute),
    /// an array field collecting the values of the heading's children
    Array(&'static str),
}

/// what a query node writes for the heading it matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection(Vec<Step>);

impl Projection {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, step: Step) {
        self.0.push(step);
    }

    pub fn apply(&self, sink: &mut dyn ResultSink, heading: &Heading) {
        for step in &self.0 {
            match step {
                Step::Set(attribute) => {
                    let value = attribute.value(heading).unwrap_or_default();
                    sink.set(&value);
                }
                Step::Field(attribute) => {
                    if let Some(value) = attribute.value(heading)
                        && !value.is_empty()
                    {
                        sink.set_field(attribute.as_str(), &value);
                    }
                }
                Step::Array(name) => sink.array(name),
            }
        }
    }
}
