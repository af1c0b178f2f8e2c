// changelog structure and version validation

use crate::error::{Error, Result};
use crate::utils::changelog::{
    ChangeKind, ChangeMap, Changelog, HeadingKind, HeadingsFactory, Listener, Release,
};
use crate::utils::markdown::DocumentHandler;
use crate::utils::semver_ops::Increment;
use serde::{Deserialize, Serialize};

/// run-time options of the validator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// reject `[Unreleased]` sections
    pub release: bool,
}

impl ValidatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn release(mut self, release: bool) -> Self {
        self.release = release;
        self
    }
}

/// validates a changelog one section boundary at a time
///
/// sections are tracked through a [`Changelog`], whose listeners see every
/// heading the validator accepts. the first broken rule stops the traversal.
pub struct Validator<'a> {
    change_kind: &'a ChangeKind,
    options: ValidatorOptions,
    changelog: Changelog<'a>,
    has_introduction: bool,
    has_released: bool,
    has_unreleased: bool,
    changes: ChangeMap,
    has_change_descriptions: bool,
    previous_release: Option<Release>,
}

impl<'a> Validator<'a> {
    pub fn new(change_kind: &'a ChangeKind) -> Self {
        Self {
            change_kind,
            options: ValidatorOptions::default(),
            changelog: Changelog::new(HeadingsFactory::new(change_kind)),
            has_introduction: false,
            has_released: false,
            has_unreleased: false,
            changes: ChangeMap::new(),
            has_change_descriptions: false,
            previous_release: None,
        }
    }

    pub fn options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn release(mut self, release: bool) -> Self {
        self.options.release = release;
        self
    }

    /// notify `listener` of every section entered and exited
    pub fn listener(&mut self, listener: &'a mut dyn Listener) {
        self.changelog.listener(listener);
    }

    fn path(&self) -> String {
        self.changelog.path()
    }

    // a release or change section being left must have received descriptions
    fn check_change_descriptions(&self) -> Result<()> {
        if (self.changelog.release() || self.changelog.change()) && !self.has_change_descriptions {
            return Err(Error::validation("no change descriptions for", self.path()));
        }
        Ok(())
    }

    fn introduction(&mut self, title: &str) -> Result<()> {
        if self.has_introduction {
            return Err(Error::validation(
                "multiple introductions not supported",
                self.path(),
            ));
        }
        self.changelog.section(HeadingKind::Introduction, title)?;
        self.has_introduction = true;
        Ok(())
    }

    fn release_section(&mut self, title: &str) -> Result<()> {
        self.check_change_descriptions()?;
        let release = self
            .changelog
            .section(HeadingKind::Release, title)?
            .as_release()
            .cloned()
            .ok_or_else(|| Error::validation("release expected", self.path()))?;

        self.check_release_order(&release)?;
        if let Some(previous) = &self.previous_release
            && previous.is_release()
            && release.is_release()
        {
            self.check_increment(previous, &release)?;
        }

        if !release.has_been_released() {
            self.has_unreleased = true;
        } else if !release.has_been_yanked() {
            self.has_released = true;
        }
        self.has_change_descriptions = false;
        self.changes.clear();
        self.previous_release = Some(release);
        Ok(())
    }

    fn check_release_order(&self, release: &Release) -> Result<()> {
        if release.has_been_released() {
            if release.has_been_yanked() && !self.has_released && !self.has_unreleased {
                return Err(Error::validation(
                    "changelog cannot start with a \"[YANKED]\" release, insert a release or a \"[Unreleased]\" first",
                    self.path(),
                ));
            }
            return Ok(());
        }

        if self.options.release {
            return Err(Error::validation(
                "\"[Unreleased]\" not supported in release mode",
                self.path(),
            ));
        }
        if self.has_unreleased {
            return Err(Error::validation(
                "multiple \"[Unreleased]\" not supported",
                self.path(),
            ));
        }
        if self.has_released {
            return Err(Error::validation(
                "\"[Unreleased]\" must come before any release",
                self.path(),
            ));
        }
        Ok(())
    }

    // the changes declared in `newer` decide the version bump from `older`
    fn check_increment(&self, newer: &Release, older: &Release) -> Result<()> {
        let (increment, trigger) = self.change_kind.increment_for(&self.changes);
        let trigger = trigger.unwrap_or_default();
        if increment == Increment::Build {
            return Err(Error::version(format!(
                "release {:?} cannot have only build-level changes because it is not the initial release",
                newer.title
            )));
        }
        newer.is_newer_than(older)?;

        let Some(next) = older.next_release(increment) else {
            return Ok(());
        };
        if newer.release_is(&next) {
            return Ok(());
        }
        if older.is_major_version_zero() && increment == Increment::Major {
            if let Some(next_minor) = older.next_release(Increment::Minor) {
                if newer.release_is(&next_minor) {
                    return Ok(());
                }
                return Err(Error::version(format!(
                    "release {:?} should have version {} or {} because of {:?}",
                    newer.title, next_minor, next, trigger
                )));
            }
        }
        Err(Error::version(format!(
            "release {:?} should have version {} because of {:?}",
            newer.title, next, trigger
        )))
    }

    fn change_section(&mut self, title: &str) -> Result<()> {
        if self.changelog.introduction() {
            return Err(Error::validation("changes must be in a release", self.path()));
        }
        if self.changelog.change() && !self.has_change_descriptions {
            return Err(Error::validation("no change descriptions for", self.path()));
        }

        self.changelog.section(HeadingKind::Change, title)?;
        if !self.changes.insert(title) {
            return Err(Error::validation(
                format!("multiple headings {:?} not supported", title),
                self.path(),
            ));
        }
        self.has_change_descriptions = false;
        Ok(())
    }
}

impl DocumentHandler for Validator<'_> {
    fn on_section_heading(&mut self, level: u8, text: &str) -> Result<()> {
        if level > 1 && !self.has_introduction {
            return Err(Error::validation(
                "introduction's title must be defined",
                self.path(),
            ));
        }
        match HeadingKind::from_level(level) {
            Some(HeadingKind::Introduction) => self.introduction(text),
            Some(HeadingKind::Release) => self.release_section(text),
            Some(HeadingKind::Change) => self.change_section(text),
            _ => Err(Error::validation(
                format!("heading level {} not supported", level),
                self.path(),
            )),
        }
    }

    fn on_list_item(&mut self, text: &str) -> Result<()> {
        if self.changelog.change() {
            self.changelog.section(HeadingKind::ChangeDescription, text)?;
            self.has_change_descriptions = true;
        }
        Ok(())
    }

    fn on_document_end(&mut self) -> Result<()> {
        if !self.has_released && !self.has_unreleased {
            return Err(Error::validation("no release defined in changelog", ""));
        }
        self.check_change_descriptions()?;
        self.changelog.close();
        Ok(())
    }
}
