// semantic version increments

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// identifier of the part of a semantic version that a change bumps
///
/// variants are declared from the most to the least severe, so the derived
/// ordering puts `Major` first and `Build` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Increment {
    Major,
    Minor,
    Patch,
    Prerelease,
    Build,
}

impl Increment {
    pub const ALL: [Increment; 5] = [
        Increment::Major,
        Increment::Minor,
        Increment::Patch,
        Increment::Prerelease,
        Increment::Build,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Increment::Major => "major",
            Increment::Minor => "minor",
            Increment::Patch => "patch",
            Increment::Prerelease => "prerelease",
            Increment::Build => "build",
        }
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Increment {
    type Err = String;

    // names are matched case-sensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Increment::Major),
            "minor" => Ok(Increment::Minor),
            "patch" => Ok(Increment::Patch),
            "prerelease" => Ok(Increment::Prerelease),
            "build" => Ok(Increment::Build),
            _ => Err(format!("{:?} is not a valid increment", s)),
        }
    }
}

/// compute the version that follows `current` for the given increment
///
/// prerelease and build increments leave the version unchanged.
pub fn next_version(current: &Version, increment: Increment) -> Version {
    match increment {
        Increment::Major => Version::new(current.major + 1, 0, 0),
        Increment::Minor => Version::new(current.major, current.minor + 1, 0),
        Increment::Patch => Version::new(current.major, current.minor, current.patch + 1),
        Increment::Prerelease | Increment::Build => current.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version_from_1_2_3() {
        let current = Version::new(1, 2, 3);
        assert_eq!(next_version(&current, Increment::Major), Version::new(2, 0, 0));
        assert_eq!(next_version(&current, Increment::Minor), Version::new(1, 3, 0));
        assert_eq!(next_version(&current, Increment::Patch), Version::new(1, 2, 4));
        assert_eq!(next_version(&current, Increment::Prerelease), current);
        assert_eq!(next_version(&current, Increment::Build), current);
    }

    #[test]
    fn test_next_version_serializes() {
        let current = Version::new(1, 2, 3);
        assert_eq!(next_version(&current, Increment::Major).to_string(), "2.0.0");
        assert_eq!(next_version(&current, Increment::Minor).to_string(), "1.3.0");
        assert_eq!(next_version(&current, Increment::Patch).to_string(), "1.2.4");
    }

    #[test]
    fn test_increment_ordering_is_by_severity() {
        assert!(Increment::Major < Increment::Minor);
        assert!(Increment::Minor < Increment::Patch);
        assert!(Increment::Patch < Increment::Prerelease);
        assert!(Increment::Prerelease < Increment::Build);
    }

    #[test]
    fn test_increment_from_str_is_case_sensitive() {
        for increment in Increment::ALL {
            assert_eq!(increment.as_str().parse::<Increment>(), Ok(increment));
        }
        assert!("Major".parse::<Increment>().is_err());
        assert!("".parse::<Increment>().is_err());
    }
}
