use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    TomlParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    IoError(std::io::Error),
    /// the change kind registry could not be built
    ChangeKindError {
        reason: String,
    },
    ChangeKindParseError(serde_json::Error),
    /// a heading title does not follow the grammar of its kind
    HeadingError {
        reason: String,
    },
    /// the document structure breaks a changelog rule
    ValidationError {
        reason: String,
        path: String,
    },
    /// consecutive releases disagree on their versions
    VersionError {
        reason: String,
    },
    QueryError {
        reason: String,
    },
    QueryIndexError {
        selector: String,
        source: ParseIntError,
    },
    OutputFormatError {
        name: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileReadError { path, source } => {
                write!(f, "failed to read file: {} ({})", path.display(), source)
            }
            Error::TomlParseError { path, source } => {
                write!(
                    f,
                    "failed to parse toml file: {} ({})",
                    path.display(),
                    source
                )
            }
            Error::IoError(err) => {
                write!(f, "io error: {}", err)
            }
            Error::ChangeKindError { reason } => {
                write!(f, "change kind error: {}", reason)
            }
            Error::ChangeKindParseError(err) => {
                write!(f, "change kind error: {}", err)
            }
            Error::HeadingError { reason } => {
                write!(f, "validation error: {}", reason)
            }
            Error::ValidationError { reason, path } => {
                if path.is_empty() {
                    write!(f, "validation error: {}", reason)
                } else {
                    write!(f, "validation error: {} {}", reason, path)
                }
            }
            Error::VersionError { reason } => {
                write!(f, "validation error: {}", reason)
            }
            Error::QueryError { reason } => {
                write!(f, "query error: {}", reason)
            }
            Error::QueryIndexError { selector, source } => {
                write!(
                    f,
                    "query error: release selector {:?} parsing error ({})",
                    selector, source
                )
            }
            Error::OutputFormatError { name } => {
                write!(
                    f,
                    "unrecognized output format {:?}, use \"json\" or \"md\"",
                    name
                )
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileReadError { source, .. } => Some(source),
            Error::TomlParseError { source, .. } => Some(source),
            Error::IoError(err) => Some(err),
            Error::ChangeKindParseError(err) => Some(err),
            Error::QueryIndexError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ChangeKindParseError(err)
    }
}

// shorthand constructors used by the validator and the query parser
impl Error {
    pub fn heading(reason: impl Into<String>) -> Self {
        Error::HeadingError {
            reason: reason.into(),
        }
    }

    pub fn validation(reason: impl Into<String>, path: impl Into<String>) -> Self {
        Error::ValidationError {
            reason: reason.into(),
            path: path.into(),
        }
    }

    pub fn version(reason: impl Into<String>) -> Self {
        Error::VersionError {
            reason: reason.into(),
        }
    }

    pub fn query(reason: impl Into<String>) -> Self {
        Error::QueryError {
            reason: reason.into(),
        }
    }

    pub fn change_kind(reason: impl Into<String>) -> Self {
        Error::ChangeKindError {
            reason: reason.into(),
        }
    }
}
