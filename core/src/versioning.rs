//! versioning.rs
//! Package (container) version handling and negotiation.
//!
//! Design notes:
//! - Package version and dictionary version are independent axes; this module
//!   only covers the container axis.
//! - The supported window is closed: same major as current, not below minimum.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u16,
}

pub const CURRENT_PACKAGE_VERSION: Version = Version::new(1, 2, 0);
pub const MINIMUM_SUPPORTED_PACKAGE_VERSION: Version = Version::new(1, 0, 0);
pub const SUPPORTED_PACKAGE_VERSIONS: &[Version] = &[
    Version::new(1, 0, 0),
    Version::new(1, 1, 0),
    CURRENT_PACKAGE_VERSION,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    Invalid(String),
    UnsupportedMajor { found: u8, expected: u8 },
    BelowMinimum(Version),
    NoCompatibleVersion(Vec<String>),
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use VersionError::*;
        match self {
            Invalid(text) => write!(f, "invalid semantic version '{}'", text),
            UnsupportedMajor { found, expected } => write!(
                f,
                "unsupported package major version {}; expected {}",
                found, expected
            ),
            BelowMinimum(v) => write!(
                f,
                "package version {} is below the minimum supported {}",
                v.short_text(),
                MINIMUM_SUPPORTED_PACKAGE_VERSION.short_text()
            ),
            NoCompatibleVersion(preferred) => write!(
                f,
                "no compatible package version found for negotiation (offered: {})",
                preferred.join(", ")
            ),
        }
    }
}

impl std::error::Error for VersionError {}

impl Version {
    pub const fn new(major: u8, minor: u8, patch: u16) -> Self {
        Self { major, minor, patch }
    }

    /// Full `major.minor.patch` form.
    pub fn text(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    /// `major.minor` when patch is zero, otherwise the full form.
    pub fn short_text(&self) -> String {
        if self.patch == 0 {
            format!("{}.{}", self.major, self.minor)
        } else {
            self.text()
        }
    }

    /// Strict `M.m` or `M.m.p` parse.
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let trimmed = value.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(VersionError::Invalid(value.to_string()));
        }
        let digit = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !parts.iter().all(|p| digit(*p)) {
            return Err(VersionError::Invalid(value.to_string()));
        }
        let invalid = |_| VersionError::Invalid(value.to_string());
        let major = parts[0].parse::<u8>().map_err(invalid)?;
        let minor = parts[1].parse::<u8>().map_err(invalid)?;
        let patch = match parts.get(2) {
            Some(p) => p.parse::<u16>().map_err(invalid)?,
            None => 0,
        };
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_any_version(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_any_version(&text).map_err(serde::de::Error::custom)
    }
}

/// Parse a version, accepting the historical `M.m` shorthand.
pub fn parse_any_version(value: &str) -> Result<Version, VersionError> {
    Version::parse(value)
}

/// Reject versions outside the supported window.
pub fn ensure_supported(version: Version) -> Result<(), VersionError> {
    if version.major != CURRENT_PACKAGE_VERSION.major {
        return Err(VersionError::UnsupportedMajor {
            found: version.major,
            expected: CURRENT_PACKAGE_VERSION.major,
        });
    }
    if version < MINIMUM_SUPPORTED_PACKAGE_VERSION {
        return Err(VersionError::BelowMinimum(version));
    }
    Ok(())
}

/// Pick the highest supported version the caller prefers.
///
/// `None` or an empty preference list selects the current version.
pub fn negotiate_version(preferred: Option<&[String]>) -> Result<Version, VersionError> {
    let preferred = match preferred {
        Some(p) if !p.is_empty() => p,
        _ => return Ok(CURRENT_PACKAGE_VERSION),
    };
    let mut parsed = Vec::with_capacity(preferred.len());
    for text in preferred {
        parsed.push(parse_any_version(text)?);
    }
    SUPPORTED_PACKAGE_VERSIONS
        .iter()
        .rev()
        .find(|candidate| parsed.contains(*candidate))
        .copied()
        .ok_or_else(|| VersionError::NoCompatibleVersion(preferred.to_vec()))
}

/// Decoder × payload compatibility lookup keyed by full version text.
pub fn compatibility_matrix(extra: &[Version]) -> BTreeMap<String, BTreeMap<String, bool>> {
    let mut all: Vec<Version> = SUPPORTED_PACKAGE_VERSIONS.to_vec();
    all.extend_from_slice(extra);
    all.sort();
    all.dedup();

    let mut matrix = BTreeMap::new();
    for decoder in &all {
        let row = all
            .iter()
            .map(|payload| {
                let ok = decoder.major == payload.major
                    && decoder >= payload
                    && *payload >= MINIMUM_SUPPORTED_PACKAGE_VERSION;
                (payload.text(), ok)
            })
            .collect();
        matrix.insert(decoder.text(), row);
    }
    matrix
}

pub fn advertised_versions() -> Vec<String> {
    SUPPORTED_PACKAGE_VERSIONS.iter().map(Version::text).collect()
}
