//! Version
//!
//! Package versions come in three schemes, from different packaging eras:
//!
//! - [VersionV2]: semver plus a security counter, `1.2.3-rc.1+security.2`
//! - [VersionV1]: three or four dotted numbers, `1.2.3.4`
//! - [FallbackVersion]: any dotted string, `2024.r17.git`
//!
//! [Version] holds exactly one of them. Parsing tries V2 first, then (when fallback
//! is allowed) V1, then the fallback scheme.
//!
//! Within one scheme the ordering is total. Across schemes every pair has its own
//! rule (see [compare]), and those rules are not promised to line up into one order
//! over all three schemes. [sort_versions] and [latest] work without that promise.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub mod compare;
mod error;
mod fallback;
mod v1;
mod v2;

pub use error::{Error, ErrorKind, Result};
pub use fallback::FallbackVersion;
pub use v1::VersionV1;
pub use v2::{Increment, VersionV2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    V1,
    V2,
    Fallback,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::V1 => f.write_str("v1"),
            Scheme::V2 => f.write_str("v2"),
            Scheme::Fallback => f.write_str("fallback"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub enum Version {
    V1(VersionV1),
    V2(VersionV2),
    Fallback(FallbackVersion),
}

impl Version {

    /// Parse a raw version string.
    ///
    /// With `allow_fallback == false` only V2 is accepted. Otherwise V1 and then the
    /// fallback scheme are tried, and only input without any non-empty segment fails.
    pub fn parse(raw: &str, allow_fallback: bool) -> Result<Self> {

        tracing::trace!(raw, allow_fallback, "parse version");

        if raw.trim().is_empty() {
            return Err(Error::empty(raw));
        }

        let v2_err = match VersionV2::parse(raw) {
            Ok(v) => return Ok(Version::V2(v)),
            Err(e) => e,
        };

        if !allow_fallback {
            return Err(v2_err);
        }

        match VersionV1::parse(raw) {
            Ok(v) => return Ok(Version::V1(v)),
            Err(e) => tracing::trace!(raw, error=%e, "not a v1 version"),
        }

        let v = FallbackVersion::parse(raw)?;
        tracing::trace!(raw, "using fallback version");
        Ok(Version::Fallback(v))
    }

    pub fn kind(&self) -> Scheme {
        match self {
            Version::V1(_) => Scheme::V1,
            Version::V2(_) => Scheme::V2,
            Version::Fallback(_) => Scheme::Fallback,
        }
    }

    pub fn is_v1(&self) -> bool {
        matches!(self, Version::V1(_))
    }

    pub fn is_v2(&self) -> bool {
        matches!(self, Version::V2(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Version::Fallback(_))
    }

    /// only V1 versions have a tweak
    pub fn has_tweak(&self) -> bool {
        match self {
            Version::V1(v) => v.has_tweak(),
            _ => false,
        }
    }

    /// Drop the tweak of a V1 version, other schemes are left alone.
    pub fn ignore_tweak(&mut self) {
        if let Version::V1(v) = self {
            v.clear_tweak();
        }
    }

    pub fn as_v1(&self) -> Option<&VersionV1> {
        match self {
            Version::V1(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_v2(&self) -> Option<&VersionV2> {
        match self {
            Version::V2(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_fallback(&self) -> Option<&FallbackVersion> {
        match self {
            Version::Fallback(v) => Some(v),
            _ => None,
        }
    }

    /// Three-way comparison by the rule for this pair of schemes.
    ///
    /// V1 against V1 compares precedence, so `1.2.3.0` and `1.2.3` compare Equal here
    /// even though they are not `==`.
    pub fn compare(&self, other: &Version) -> Ordering {
        use Version::*;
        match (self, other) {
            (V1(a), V1(b)) => a.cmp_precedence(b),
            (V2(a), V2(b)) => a.cmp(b),
            (Fallback(a), Fallback(b)) => a.compare(b),

            (V1(a), V2(b)) => compare::cmp_v1_v2(a, b),
            (V2(a), V1(b)) => compare::cmp_v1_v2(b, a).reverse(),

            (V1(a), Fallback(b)) => compare::cmp_v1_fallback(a, b),
            (Fallback(a), V1(b)) => compare::cmp_v1_fallback(b, a).reverse(),

            (V2(a), Fallback(b)) => compare::cmp_v2_fallback(a, b),
            (Fallback(a), V2(b)) => compare::cmp_v2_fallback(b, a).reverse(),
        }
    }

    /// Compare against a bare `major.minor.patch` release.
    pub fn compare_release(&self, major: u64, minor: u64, patch: u64) -> Ordering {
        match self {
            Version::V1(v) => v.cmp_precedence(&VersionV1::new(major, minor, patch, None)),
            Version::V2(v) => v.cmp_release(major, minor, patch),
            Version::Fallback(v) => {
                let release = format!("{major}.{minor}.{patch}");
                FallbackVersion::cmp_canonical(&release, v).reverse()
            }
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Version) -> bool {
        match (self, other) {
            (Version::V1(a), Version::V1(b)) => a == b,
            _ => self.compare(other) == Ordering::Equal,
        }
    }
}

impl PartialOrd for Version {
    // None only for V1 pairs of equal precedence that differ in tweak presence
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        match self.compare(other) {
            Ordering::Equal if self != other => None,
            ord => Some(ord),
        }
    }
}

impl From<VersionV1> for Version {
    fn from(v: VersionV1) -> Self {
        Version::V1(v)
    }
}

impl From<VersionV2> for Version {
    fn from(v: VersionV2) -> Self {
        Version::V2(v)
    }
}

impl From<FallbackVersion> for Version {
    fn from(v: FallbackVersion) -> Self {
        Version::Fallback(v)
    }
}

impl std::str::FromStr for Version {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, true)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s, true)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1(v) => std::fmt::Display::fmt(v, f),
            Version::V2(v) => std::fmt::Display::fmt(v, f),
            Version::Fallback(v) => std::fmt::Display::fmt(v, f),
        }
    }
}

/// Stable ascending sort by [Version::compare].
///
/// Does not rely on a total order across schemes, so a catalog mixing schemes
/// still sorts deterministically.
pub fn sort_versions(versions: &mut [Version]) {
    sort_by_version(versions, |v| v);
}

/// [sort_versions] for anything that carries a version.
pub fn sort_by_version<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &Version,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && key(&items[j - 1]).compare(key(&items[j])) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// The greatest version by [Version::compare], the first one wins a tie.
pub fn latest<'a, I>(versions: I) -> Option<&'a Version>
where
    I: IntoIterator<Item = &'a Version>,
{
    versions.into_iter().fold(None, |best, v| match best {
        Some(b) if v.compare(b) != Ordering::Greater => Some(b),
        _ => Some(v),
    })
}
