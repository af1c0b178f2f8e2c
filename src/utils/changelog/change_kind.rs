// change kind registry

use crate::error::{Error, Result};
use crate::utils::semver_ops::Increment;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

/// a single change kind: the level-3 heading name, the version increment
/// it implies and an optional glyph shown in front of the name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeKindEntry {
    pub name: String,
    pub increment: Increment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl ChangeKindEntry {
    pub fn new(name: impl Into<String>, increment: Increment) -> Self {
        Self {
            name: name.into(),
            increment,
            emoji: None,
        }
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// registry of the supported change kinds
///
/// built once per invocation and shared read-only by every document
/// validated with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeKind {
    kinds: BTreeMap<String, ChangeKindEntry>,
}

impl ChangeKind {
    /// the six keep-a-changelog kinds
    pub fn new() -> Self {
        let defaults = [
            ("Added", Increment::Major),
            ("Removed", Increment::Major),
            ("Changed", Increment::Minor),
            ("Deprecated", Increment::Minor),
            ("Fixed", Increment::Patch),
            ("Security", Increment::Patch),
        ];
        let kinds = defaults
            .into_iter()
            .map(|(name, increment)| (name.to_string(), ChangeKindEntry::new(name, increment)))
            .collect();
        Self { kinds }
    }

    /// build a registry from explicit entries, rejecting blank and duplicate names
    pub fn from_entries(entries: Vec<ChangeKindEntry>) -> Result<Self> {
        let mut kinds = BTreeMap::new();
        for mut entry in entries {
            // a blank glyph is no glyph
            entry.emoji = entry.emoji.filter(|emoji| !emoji.trim().is_empty());
            if entry.name.trim().is_empty() {
                return Err(Error::change_kind(format!(
                    "change kind with increment {:?} has a blank name",
                    entry.increment.as_str()
                )));
            }
            if kinds.contains_key(&entry.name) {
                return Err(Error::change_kind(format!(
                    "change kind {:?} is defined more than once",
                    entry.name
                )));
            }
            kinds.insert(entry.name.clone(), entry);
        }
        if kinds.is_empty() {
            return Err(Error::change_kind("no change kind defined"));
        }
        Ok(Self { kinds })
    }

    /// parse a json list of `{name, increment, emoji?}`; an empty source
    /// yields the default registry
    pub fn from_json(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::new());
        }
        let entries: Vec<ChangeKindEntry> = serde_json::from_str(source)?;
        let change_kind = Self::from_entries(entries)?;
        tracing::debug!(kinds = %change_kind.names(), "loaded change kinds");
        Ok(change_kind)
    }

    /// load the registry from a json file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// serialize the registry back to its json list form, sorted by name
    pub fn to_json(&self) -> Result<String> {
        let entries: Vec<&ChangeKindEntry> = self.kinds.values().collect();
        Ok(serde_json::to_string(&entries)?)
    }

    pub fn get(&self, name: &str) -> Option<&ChangeKindEntry> {
        self.kinds.get(name)
    }

    /// look up `title`, failing when it is not exactly one of the configured names
    pub fn is_supported(&self, title: &str) -> Result<&ChangeKindEntry> {
        self.kinds.get(title).ok_or_else(|| {
            Error::heading(format!(
                "unknown change heading {:?} is not one of [{}]",
                title,
                self.names()
            ))
        })
    }

    /// the most severe increment among the declared changes, with the name
    /// of the change that triggered it
    ///
    /// returns `Increment::Build` and no trigger when nothing recognized was declared.
    pub fn increment_for(&self, changes: &ChangeMap) -> (Increment, Option<String>) {
        let mut increment = Increment::Build;
        let mut trigger = None;
        for name in changes.iter() {
            if let Some(entry) = self.kinds.get(name)
                && entry.increment < increment
            {
                increment = entry.increment;
                trigger = Some(name.to_string());
            }
        }
        (increment, trigger)
    }

    /// comma-separated, sorted list of the configured names
    pub fn names(&self) -> String {
        self.kinds.keys().cloned().collect::<Vec<_>>().join(", ")
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for ChangeKind {
    fn default() -> Self {
        Self::new()
    }
}

/// the change kinds declared within the currently open release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeMap {
    changes: BTreeSet<String>,
}

impl ChangeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// record a change kind, returning false when it was already declared
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.changes.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.changes.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeMap {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ChangeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::changelog::{HeadingKind, parse_heading};
    use std::io::Write;

    #[test]
    fn test_default_registry() {
        let change_kind = ChangeKind::new();
        assert_eq!(
            change_kind.names(),
            "Added, Changed, Deprecated, Fixed, Removed, Security"
        );
        assert_eq!(change_kind.get("Added").unwrap().increment, Increment::Major);
        assert_eq!(change_kind.get("Removed").unwrap().increment, Increment::Major);
        assert_eq!(change_kind.get("Changed").unwrap().increment, Increment::Minor);
        assert_eq!(change_kind.get("Deprecated").unwrap().increment, Increment::Minor);
        assert_eq!(change_kind.get("Fixed").unwrap().increment, Increment::Patch);
        assert_eq!(change_kind.get("Security").unwrap().increment, Increment::Patch);
        assert!(change_kind.get("Fixed").unwrap().emoji.is_none());
    }

    #[test]
    fn test_is_supported_exact_match_only() {
        let change_kind = ChangeKind::new();
        assert!(change_kind.is_supported("Fixed").is_ok());
        assert!(change_kind.is_supported("Modified").is_err());
        assert!(change_kind.is_supported("").is_err());
        assert!(change_kind.is_supported("fixed").is_err());
        assert!(change_kind.is_supported("Fix").is_err());
        assert!(change_kind.is_supported("Fixed ").is_err());
        assert!(change_kind.is_supported("Fixed bugs").is_err());
    }

    #[test]
    fn test_unknown_heading_lists_known_names() {
        let change_kind = ChangeKind::new();
        let err = change_kind.is_supported("Modified").unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation error: unknown change heading \"Modified\" is not one of [Added, Changed, Deprecated, Fixed, Removed, Security]"
        );
    }

    #[test]
    fn test_increment_for() {
        let change_kind = ChangeKind::new();
        let cases: Vec<(Vec<&str>, Increment, Option<&str>)> = vec![
            (vec!["Added"], Increment::Major, Some("Added")),
            (vec!["Changed"], Increment::Minor, Some("Changed")),
            (vec!["Fixed"], Increment::Patch, Some("Fixed")),
            (vec!["Fixed", "Changed"], Increment::Minor, Some("Changed")),
            (vec!["Security", "Removed", "Changed"], Increment::Major, Some("Removed")),
            (vec!["Unknown"], Increment::Build, None),
            (vec![], Increment::Build, None),
        ];
        for (names, expected_increment, expected_trigger) in cases {
            let changes: ChangeMap = names.into_iter().collect();
            let (increment, trigger) = change_kind.increment_for(&changes);
            assert_eq!(increment, expected_increment, "for {}", changes);
            assert_eq!(trigger.as_deref(), expected_trigger, "for {}", changes);
        }
    }

    #[test]
    fn test_empty_source_is_default() {
        assert_eq!(ChangeKind::from_json("").unwrap(), ChangeKind::new());
        assert_eq!(ChangeKind::from_json("  \n").unwrap(), ChangeKind::new());
    }

    #[test]
    fn test_from_json() {
        let change_kind = ChangeKind::from_json(
            r#"[{"name":"Added", "increment":"major"}, {"name":"Fixed", "increment":"patch"}]"#,
        )
        .unwrap();
        assert_eq!(change_kind.names(), "Added, Fixed");
    }

    #[test]
    fn test_from_json_with_emoji() {
        let change_kind = ChangeKind::from_json(
            r#"[{"name":"Fixed", "increment":"patch", "emoji":"🐛"}, {"name":"Security", "increment":"patch", "emoji":"🔒"}]"#,
        )
        .unwrap();
        assert_eq!(change_kind.names(), "Fixed, Security");
        assert_eq!(change_kind.get("Fixed").unwrap().emoji.as_deref(), Some("🐛"));
        assert_eq!(change_kind.get("Security").unwrap().emoji.as_deref(), Some("🔒"));
    }

    #[test]
    fn test_from_json_with_blank_emoji() {
        let change_kind =
            ChangeKind::from_json(r#"[{"name":"Added", "increment":"major", "emoji":""}]"#)
                .unwrap();
        assert_eq!(change_kind.get("Added").unwrap().emoji, None);
        let heading = parse_heading(HeadingKind::Change, "Added", &change_kind).unwrap();
        assert_eq!(heading.display_title(), "Added");
    }

    #[test]
    fn test_from_json_rejects_object() {
        let result = ChangeKind::from_json(r#"{"name":"Added", "increment":"major"}"#);
        assert!(matches!(result, Err(Error::ChangeKindParseError(_))));
    }

    #[test]
    fn test_from_json_rejects_capitalized_increment() {
        let result = ChangeKind::from_json(
            r#"[{"name":"Added", "increment":"Major"}, {"name":"Fixed", "increment":"Patch"}]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        assert!(ChangeKind::from_json(r#"[{"increment":"major"}]"#).is_err());
        assert!(ChangeKind::from_json(r#"[{"name":"Added"}]"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_blank_name() {
        let result = ChangeKind::from_json(r#"[{"name":"  ", "increment":"major"}]"#);
        assert!(matches!(result, Err(Error::ChangeKindError { .. })));
    }

    #[test]
    fn test_from_json_rejects_duplicate_name() {
        let result = ChangeKind::from_json(
            r#"[{"name":"Added", "increment":"major"}, {"name":"Added", "increment":"minor"}]"#,
        );
        assert!(matches!(result, Err(Error::ChangeKindError { .. })));
    }

    #[test]
    fn test_to_json_sorted_by_name() {
        let json = ChangeKind::new().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let expected = serde_json::json!([
            {"name":"Added", "increment":"major"},
            {"name":"Changed", "increment":"minor"},
            {"name":"Deprecated", "increment":"minor"},
            {"name":"Fixed", "increment":"patch"},
            {"name":"Removed", "increment":"major"},
            {"name":"Security", "increment":"patch"}
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name":"Fixed", "increment":"patch"}}]"#).unwrap();
        let change_kind = ChangeKind::load_from_file(file.path()).unwrap();
        assert_eq!(change_kind.names(), "Fixed");
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ChangeKind::load_from_file("does/not/exist.json");
        assert!(matches!(result, Err(Error::FileReadError { .. })));
    }

    #[test]
    fn test_change_map_detects_duplicates() {
        let mut changes = ChangeMap::new();
        assert!(changes.insert("Added"));
        assert!(!changes.insert("Added"));
        assert!(changes.contains("Added"));
        changes.clear();
        assert!(changes.is_empty());
    }
}
