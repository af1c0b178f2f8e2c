// changelog heading model

use crate::error::{Error, Result};
use crate::utils::semver_ops::{Increment, next_version};
use chrono::NaiveDate;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// the four kinds of sections of a changelog; the order is the nesting depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingKind {
    Introduction,
    Release,
    Change,
    ChangeDescription,
}

impl HeadingKind {
    pub fn depth(self) -> usize {
        match self {
            HeadingKind::Introduction => 0,
            HeadingKind::Release => 1,
            HeadingKind::Change => 2,
            HeadingKind::ChangeDescription => 3,
        }
    }

    /// map a markdown heading level (1 to 3) to its section kind
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingKind::Introduction),
            2 => Some(HeadingKind::Release),
            3 => Some(HeadingKind::Change),
            _ => None,
        }
    }
}

impl fmt::Display for HeadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingKind::Introduction => write!(f, "introduction"),
            HeadingKind::Release => write!(f, "release"),
            HeadingKind::Change => write!(f, "change"),
            HeadingKind::ChangeDescription => write!(f, "change description"),
        }
    }
}

/// level 1 heading, the title of the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Introduction {
    pub title: String,
}

/// level 2 heading, a release or the `[Unreleased]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub title: String,
    /// absent for `[Unreleased]`
    pub version: Option<Version>,
    pub date: Option<NaiveDate>,
    pub label: Option<String>,
    pub yanked: bool,
}

/// publication status of a release, as exposed by queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Unreleased,
    Yanked,
    Prereleased,
    Released,
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseStatus::Unreleased => write!(f, "unreleased"),
            ReleaseStatus::Yanked => write!(f, "yanked"),
            ReleaseStatus::Prereleased => write!(f, "prereleased"),
            ReleaseStatus::Released => write!(f, "released"),
        }
    }
}

impl Release {
    pub fn unreleased(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: None,
            date: None,
            label: None,
            yanked: false,
        }
    }

    pub fn is_unreleased(&self) -> bool {
        self.version.is_none()
    }

    pub fn has_been_released(&self) -> bool {
        self.date.is_some()
    }

    pub fn has_been_yanked(&self) -> bool {
        self.yanked
    }

    /// released with a plain `major.minor.patch` version
    pub fn is_release(&self) -> bool {
        self.has_been_released()
            && self
                .version
                .as_ref()
                .is_some_and(|v| v.pre.is_empty() && v.build.is_empty())
    }

    /// released with a pre-release component and no build metadata
    pub fn is_prerelease(&self) -> bool {
        self.has_been_released()
            && self
                .version
                .as_ref()
                .is_some_and(|v| !v.pre.is_empty() && v.build.is_empty())
    }

    pub fn is_major_version_zero(&self) -> bool {
        self.version.as_ref().is_some_and(|v| v.major == 0)
    }

    pub fn status(&self) -> ReleaseStatus {
        if !self.has_been_released() {
            ReleaseStatus::Unreleased
        } else if self.yanked {
            ReleaseStatus::Yanked
        } else if self.is_prerelease() {
            ReleaseStatus::Prereleased
        } else {
            ReleaseStatus::Released
        }
    }

    pub fn version_string(&self) -> Option<String> {
        self.version.as_ref().map(Version::to_string)
    }

    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// the version a newer release must carry for the given increment
    pub fn next_release(&self, increment: Increment) -> Option<Version> {
        self.version.as_ref().map(|v| next_version(v, increment))
    }

    pub fn release_is(&self, version: &Version) -> bool {
        self.version.as_ref() == Some(version)
    }

    /// check that `older`, listed after `self`, is dated no later and
    /// carries a strictly lower version
    pub fn is_newer_than(&self, older: &Release) -> Result<()> {
        let out_of_order = match (self.date, older.date) {
            (Some(newer_date), Some(older_date)) => newer_date < older_date,
            _ => false,
        };
        let out_of_sequence = match (&self.version, &older.version) {
            (Some(newer_version), Some(older_version)) => newer_version <= older_version,
            _ => false,
        };
        if out_of_order || out_of_sequence {
            return Err(Error::version(format!(
                "release {:?} should be older than {:?}",
                older.title, self.title
            )));
        }
        Ok(())
    }
}

/// level 3 heading, a kind of change registered in the change kind registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub title: String,
    pub increment: Increment,
    pub emoji: Option<String>,
}

/// a single change description, one list item under a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeItem {
    pub title: String,
}

/// a section of the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heading {
    Introduction(Introduction),
    Release(Release),
    Change(Change),
    ChangeItem(ChangeItem),
}

impl Heading {
    pub fn kind(&self) -> HeadingKind {
        match self {
            Heading::Introduction(_) => HeadingKind::Introduction,
            Heading::Release(_) => HeadingKind::Release,
            Heading::Change(_) => HeadingKind::Change,
            Heading::ChangeItem(_) => HeadingKind::ChangeDescription,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Heading::Introduction(h) => &h.title,
            Heading::Release(h) => &h.title,
            Heading::Change(h) => &h.title,
            Heading::ChangeItem(h) => &h.title,
        }
    }

    /// the title prefixed by the change kind's emoji, when one is configured
    pub fn display_title(&self) -> String {
        match self {
            Heading::Change(Change {
                title,
                emoji: Some(emoji),
                ..
            }) => format!("{} {}", emoji, title),
            _ => self.title().to_string(),
        }
    }

    /// `{title}`, the element of a changelog path
    pub fn as_path(&self) -> String {
        format!("{{{}}}", self.title())
    }

    pub fn as_release(&self) -> Option<&Release> {
        match self {
            Heading::Release(release) => Some(release),
            _ => None,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.title())
    }
}
