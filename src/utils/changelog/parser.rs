// changelog heading parser

use super::change_kind::ChangeKind;
use super::types::{Change, ChangeItem, Heading, HeadingKind, Introduction, Release};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use semver::Version;
use std::sync::LazyLock;

static UNRELEASED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*Unreleased\s*\]$").expect("invalid unreleased regex")
});

/// `[<version>] - <date>[ <label>]`
static RELEASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\[\s*(?P<semver>\S+?)\s*\]\s+-\s+(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2})(?:\s+(?P<label>.+))?$",
    )
    .expect("invalid release regex")
});

/// `<version> - <date> [YANKED]`
static YANKED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<semver>\S+?)\s+-\s+(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2})\s+\[\s*YANKED\s*\]$",
    )
    .expect("invalid yanked release regex")
});

static YANKED_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*YANKED\s*\]").expect("invalid yanked label regex"));

/// builds headings from raw titles, validating them against their grammar
#[derive(Debug, Clone, Copy)]
pub struct HeadingsFactory<'a> {
    change_kind: &'a ChangeKind,
}

impl<'a> HeadingsFactory<'a> {
    pub fn new(change_kind: &'a ChangeKind) -> Self {
        Self { change_kind }
    }

    pub fn change_kind(&self) -> &'a ChangeKind {
        self.change_kind
    }

    pub fn new_heading(&self, kind: HeadingKind, title: &str) -> Result<Heading> {
        match kind {
            HeadingKind::Introduction => parse_introduction(title),
            HeadingKind::Release => parse_release(title),
            HeadingKind::Change => self.parse_change(title),
            HeadingKind::ChangeDescription => parse_change_item(title),
        }
    }

    fn parse_change(&self, title: &str) -> Result<Heading> {
        if title.is_empty() {
            return Err(Error::heading("change cannot stay empty"));
        }
        let entry = self.change_kind.is_supported(title)?;
        Ok(Heading::Change(Change {
            title: title.to_string(),
            increment: entry.increment,
            emoji: entry.emoji.clone(),
        }))
    }
}

/// parse the raw title of a section of the given kind
pub fn parse_heading(kind: HeadingKind, title: &str, change_kind: &ChangeKind) -> Result<Heading> {
    HeadingsFactory::new(change_kind).new_heading(kind, title)
}

fn parse_introduction(title: &str) -> Result<Heading> {
    if title.is_empty() {
        return Err(Error::heading("introduction's title cannot stay empty"));
    }
    Ok(Heading::Introduction(Introduction {
        title: title.to_string(),
    }))
}

fn parse_change_item(title: &str) -> Result<Heading> {
    if title.is_empty() {
        return Err(Error::heading("change description cannot stay empty"));
    }
    Ok(Heading::ChangeItem(ChangeItem {
        title: title.to_string(),
    }))
}

fn parse_release(title: &str) -> Result<Heading> {
    if UNRELEASED_RE.is_match(title) {
        return Ok(Heading::Release(Release::unreleased(title)));
    }

    if let Some(captures) = RELEASE_RE.captures(title) {
        let date = parse_date(&captures, title)?;
        let label = captures.name("label").map(|m| m.as_str().to_string());
        if label.as_deref().is_some_and(|l| YANKED_LABEL_RE.is_match(l)) {
            return Err(Error::heading(format!(
                "the version of a [YANKED] release cannot stand between [...] for {}",
                title
            )));
        }
        let version = parse_version(&captures, title)?;
        return Ok(Heading::Release(Release {
            title: title.to_string(),
            version: Some(version),
            date: Some(date),
            label,
            yanked: false,
        }));
    }

    if let Some(captures) = YANKED_RE.captures(title) {
        let date = parse_date(&captures, title)?;
        let version = parse_version(&captures, title)?;
        return Ok(Heading::Release(Release {
            title: title.to_string(),
            version: Some(version),
            date: Some(date),
            label: None,
            yanked: true,
        }));
    }

    Err(Error::heading(format!("unknown release header for {:?}", title)))
}

fn parse_date(captures: &Captures<'_>, title: &str) -> Result<NaiveDate> {
    let date = captures.name("date").map_or("", |m| m.as_str());
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| Error::heading(format!("illegal date ({}) for {}", e, title)))
}

fn parse_version(captures: &Captures<'_>, title: &str) -> Result<Version> {
    let version = captures.name("semver").map_or("", |m| m.as_str());
    Version::parse(version)
        .map_err(|e| Error::heading(format!("illegal version ({}) for {}", e, title)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::changelog::change_kind::ChangeKindEntry;
    use crate::utils::changelog::types::ReleaseStatus;
    use crate::utils::semver_ops::Increment;

    fn release(title: &str) -> Result<Release> {
        match parse_heading(HeadingKind::Release, title, &ChangeKind::new())? {
            Heading::Release(r) => Ok(r),
            other => panic!("expected a release, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_introduction() {
        let h = parse_heading(HeadingKind::Introduction, "Changelog", &ChangeKind::new()).unwrap();
        assert_eq!(h.kind(), HeadingKind::Introduction);
        assert_eq!(h.title(), "Changelog");
        assert_eq!(h.display_title(), "Changelog");
        assert_eq!(h.as_path(), "{Changelog}");
    }

    #[test]
    fn test_parse_empty_introduction() {
        let result = parse_heading(HeadingKind::Introduction, "", &ChangeKind::new());
        assert!(matches!(result, Err(Error::HeadingError { .. })));
    }

    #[test]
    fn test_parse_unreleased() {
        for title in ["[Unreleased]", "[ Unreleased ]", "[Unreleased  ]"] {
            let r = release(title).unwrap();
            assert!(r.is_unreleased(), "{}", title);
            assert!(!r.has_been_released());
            assert_eq!(r.title, title);
        }
        assert!(release("Unreleased").is_err());
        assert!(release("[unreleased]").is_err());
    }

    #[test]
    fn test_parse_release() {
        let r = release("[1.2.3] - 2020-05-16").unwrap();
        assert_eq!(r.version, Some(Version::new(1, 2, 3)));
        assert_eq!(r.date_string().as_deref(), Some("2020-05-16"));
        assert_eq!(r.label, None);
        assert!(!r.yanked);
        assert!(r.is_release());
    }

    #[test]
    fn test_parse_release_with_label() {
        let r = release("[1.2.2] - 2020-05-15 Cabrel").unwrap();
        assert_eq!(r.version_string().as_deref(), Some("1.2.2"));
        assert_eq!(r.label.as_deref(), Some("Cabrel"));
    }

    #[test]
    fn test_parse_release_whitespace_in_brackets() {
        let r = release("[ 1.2.3 ] - 2020-05-16").unwrap();
        assert_eq!(r.version, Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_prerelease() {
        let r = release("[1.2.3-rc.1] - 2020-05-16").unwrap();
        assert!(r.is_prerelease());
        assert_eq!(r.status(), ReleaseStatus::Prereleased);
    }

    #[test]
    fn test_parse_yanked_release() {
        let r = release("1.2.2 - 2020-05-15 [YANKED]").unwrap();
        assert!(r.yanked);
        assert!(r.is_release());
        assert_eq!(r.version, Some(Version::new(1, 2, 2)));
        assert_eq!(r.status(), ReleaseStatus::Yanked);

        let r = release("1.2.2 - 2020-05-15 [ YANKED ]").unwrap();
        assert!(r.yanked);
    }

    #[test]
    fn test_parse_bracketed_yanked_release_fails() {
        let err = release("[1.2.3] - 2020-04-15 [YANKED]").unwrap_err();
        assert!(err.to_string().contains("cannot stand between [...]"));
    }

    #[test]
    fn test_parse_release_bad_date() {
        let err = release("[1.2.3] - 2020-02-30").unwrap_err();
        assert!(err.to_string().contains("illegal date"));
        assert!(release("[1.2.3] - 2020-5-16").is_err());
        assert!(release("[1.2.3] - 16/05/2020").is_err());
        assert!(release("1.2.3 - 2020-13-01 [YANKED]").is_err());
    }

    #[test]
    fn test_parse_release_bad_version() {
        let err = release("[1.2] - 2020-05-16").unwrap_err();
        assert!(err.to_string().contains("illegal version"));
        assert!(release("[v1.2.3] - 2020-05-16").is_err());
        assert!(release("one - 2020-05-16 [YANKED]").is_err());
    }

    #[test]
    fn test_parse_release_unknown_shape() {
        for title in ["", "1.2.3", "[1.2.3]", "[1.2.3] 2020-05-16", "1.2.3 - 2020-05-16"] {
            assert!(release(title).is_err(), "{:?} should be rejected", title);
        }
    }

    #[test]
    fn test_parse_change() {
        let h = parse_heading(HeadingKind::Change, "Added", &ChangeKind::new()).unwrap();
        match h {
            Heading::Change(change) => {
                assert_eq!(change.title, "Added");
                assert_eq!(change.increment, Increment::Major);
                assert_eq!(change.emoji, None);
            }
            other => panic!("expected a change, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_change_is_exact_match() {
        let change_kind = ChangeKind::new();
        for title in ["", "added", "Add", "Added stuff", " Added", "Modified"] {
            assert!(
                parse_heading(HeadingKind::Change, title, &change_kind).is_err(),
                "{:?} should be rejected",
                title
            );
        }
    }

    #[test]
    fn test_parse_change_with_emoji() {
        let change_kind =
            ChangeKind::from_entries(vec![ChangeKindEntry::new("Fixed", Increment::Patch).emoji("🐛")])
                .unwrap();
        let h = parse_heading(HeadingKind::Change, "Fixed", &change_kind).unwrap();
        assert_eq!(h.display_title(), "🐛 Fixed");
        assert_eq!(h.title(), "Fixed");
    }

    #[test]
    fn test_parse_change_item() {
        let h = parse_heading(HeadingKind::ChangeDescription, "foo", &ChangeKind::new()).unwrap();
        assert_eq!(h.kind(), HeadingKind::ChangeDescription);
        assert_eq!(h.title(), "foo");
        assert!(parse_heading(HeadingKind::ChangeDescription, "", &ChangeKind::new()).is_err());
    }
}
