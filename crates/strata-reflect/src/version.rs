//! Platform versions
//!
//! `PlatformVersion` is the `major.minor.patch` triple of the running
//! platform. A bare number is read as a minor release of the `1.x` line, so
//! `"13"` and `"1.13"` name the same version.
//!
//! `VersionInformation` is the process-wide view of the running version. It
//! is initialised once at startup and read by callers that guard
//! version-gated behaviour.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while parsing or publishing a version
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Invalid version format
    #[error("Invalid version format: {0}")]
    InvalidVersion(String),

    /// The process-wide version was already set to something else
    #[error("Platform version already initialized to {current}")]
    AlreadyInitialized {
        /// Version that is already installed
        current: PlatformVersion,
    },

    /// The process-wide version has not been set
    #[error("Platform version has not been initialized")]
    Uninitialized,
}

/// Platform version (MAJOR.MINOR.PATCH)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl PlatformVersion {
    /// Create a version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version `1.minor.0`
    pub const fn minor(minor: u32) -> Self {
        Self::new(1, minor, 0)
    }

    /// Parse a version string (`1.20.4`, `1.13`, `v1.8.8` or a bare minor `13`)
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let s = s.trim();
        let s = s.strip_prefix('v').unwrap_or(s);
        let invalid = || VersionError::InvalidVersion(s.to_string());

        let parts = s
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [minor] => Ok(Self::minor(*minor)),
            [major, minor] => Ok(Self::new(*major, *minor, 0)),
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            _ => Err(invalid()),
        }
    }

    /// Whether this version is at least `1.minor`
    pub fn supports(&self, minor: u32) -> bool {
        *self >= Self::minor(minor)
    }

    /// Whether this version is at least `1.minor.patch`
    pub fn supports_patch(&self, minor: u32, patch: u32) -> bool {
        *self >= Self::new(1, minor, patch)
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

impl FromStr for PlatformVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlatformVersion {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PlatformVersion> for String {
    fn from(v: PlatformVersion) -> Self {
        v.to_string()
    }
}

// ============================================================================
// Process-wide version
// ============================================================================

static RUNNING: OnceCell<PlatformVersion> = OnceCell::new();

/// Process-wide running platform version
pub struct VersionInformation;

impl VersionInformation {
    /// Publish the running version. Re-publishing the same version is a no-op.
    pub fn init(version: PlatformVersion) -> Result<(), VersionError> {
        let current = *RUNNING.get_or_init(|| version);
        if current == version {
            tracing::debug!(%version, "platform version initialized");
            Ok(())
        } else {
            Err(VersionError::AlreadyInitialized { current })
        }
    }

    /// The running version, if published
    pub fn current() -> Option<PlatformVersion> {
        RUNNING.get().copied()
    }

    /// The running version, or `Uninitialized`
    pub fn get() -> Result<PlatformVersion, VersionError> {
        Self::current().ok_or(VersionError::Uninitialized)
    }

    /// Whether the running version is at least `1.minor`; false before initialisation
    pub fn supports(minor: u32) -> bool {
        Self::current().is_some_and(|v| v.supports(minor))
    }

    /// Whether the running version is at least `1.minor.patch`; false before initialisation
    pub fn supports_patch(minor: u32, patch: u32) -> bool {
        Self::current().is_some_and(|v| v.supports_patch(minor, patch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        assert_eq!(PlatformVersion::parse("1.20.4").unwrap(), PlatformVersion::new(1, 20, 4));
        assert_eq!(PlatformVersion::parse("1.13").unwrap(), PlatformVersion::new(1, 13, 0));
        assert_eq!(PlatformVersion::parse("13").unwrap(), PlatformVersion::new(1, 13, 0));
        assert_eq!(PlatformVersion::parse("v1.8.8").unwrap(), PlatformVersion::new(1, 8, 8));
    }

    #[test]
    fn test_parse_invalid_versions() {
        assert!(PlatformVersion::parse("").is_err());
        assert!(PlatformVersion::parse("1.x").is_err());
        assert!(PlatformVersion::parse("1.2.3.4").is_err());
    }

    #[test]
    fn test_ordering_and_supports() {
        let v = PlatformVersion::parse("1.20.4").unwrap();
        assert!(v > PlatformVersion::minor(20));
        assert!(v.supports(20));
        assert!(v.supports(13));
        assert!(!v.supports(21));
        assert!(v.supports_patch(20, 4));
        assert!(!v.supports_patch(20, 5));
    }

    #[test]
    fn test_display() {
        assert_eq!(PlatformVersion::new(1, 20, 4).to_string(), "1.20.4");
        assert_eq!(PlatformVersion::minor(13).to_string(), "1.13");
    }

    #[test]
    fn test_process_wide_version() {
        let v = PlatformVersion::new(1, 20, 4);
        VersionInformation::init(v).unwrap();
        VersionInformation::init(v).unwrap();
        assert_eq!(VersionInformation::current(), Some(v));
        assert!(VersionInformation::supports(20));
        assert_eq!(
            VersionInformation::init(PlatformVersion::minor(8)),
            Err(VersionError::AlreadyInitialized { current: v })
        );
    }
}
