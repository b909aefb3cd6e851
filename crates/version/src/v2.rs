// V2 versions
//
// Semver (https://semver.org) plus a "security" counter for hotfix releases.
// Grammar and precedence of major.minor.patch-prerelease come from the semver crate.
// The security counter rides in the build metadata as the trailing identifiers
// "security.N", and unlike the rest of the build metadata it takes part in ordering.
//
// example: 1.2.3
//          v1.2.3-rc.1
//          1.2.3+security.2            security = 2
//          1.2.3-alpha+build.3.security.1
//
// Ordering: (major, minor, patch), then prerelease (a prerelease is lesser than a
// release), then security. Other build metadata is ignored.

use crate::error::{Error, Result};
use semver::{BuildMetadata, Prerelease};
use std::cmp::Ordering;

const SECURITY_IDENT: &str = "security";

#[derive(Debug, Clone)]
pub struct VersionV2 {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Prerelease,

    /// build metadata without the security identifiers
    pub build: BuildMetadata,
    pub security: u64,
}

/// Which part of a V2 version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    Major,
    Minor,
    Patch,
    Prerelease,
    Security,
}

impl std::str::FromStr for Increment {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(Increment::Major),
            "minor" => Ok(Increment::Minor),
            "patch" => Ok(Increment::Patch),
            "prerelease" | "pre" => Ok(Increment::Prerelease),
            "security" => Ok(Increment::Security),
            _ => Err(Error::invalid(s, "expected one of major, minor, patch, prerelease, security")),
        }
    }
}

fn is_numeric_ident(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// "0" or no leading zero
fn is_canonical_number(s: &str) -> bool {
    is_numeric_ident(s) && (s == "0" || !s.starts_with('0'))
}

/// When semver rejects the input, find a core number that is all digits but too large.
fn core_overflow(v: &str) -> Option<&'static str> {
    let core = v.split(['-', '+']).next().unwrap_or(v);
    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    std::iter::zip(parts, ["major", "minor", "patch"])
        .find(|(part, _)| is_numeric_ident(part) && part.parse::<u64>().is_err())
        .map(|(_, name)| name)
}

/// "build.3.security.1" -> ("build.3", 1)
fn split_security<'a>(raw: &str, build: &'a str) -> Result<(&'a str, u64)> {

    let Some((rest, last)) = build.rsplit_once('.') else {
        return Ok((build, 0));
    };

    let (rest, ident) = match rest.rsplit_once('.') {
        Some((rest, ident)) => (rest, ident),
        None => ("", rest),
    };

    if ident != SECURITY_IDENT || !is_canonical_number(last) {
        return Ok((build, 0));
    }

    let security = last.parse::<u64>().map_err(|_| Error::overflow(raw, "security"))?;
    Ok((rest, security))
}

impl VersionV2 {

    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
            security: 0,
        }
    }

    pub fn with_security(mut self, security: u64) -> Self {
        self.security = security;
        self
    }

    pub fn parse(raw: &str) -> Result<Self> {

        let v = raw.strip_prefix('v')
                   .or_else(|| raw.strip_prefix('V'))
                   .unwrap_or(raw);

        let sv = match semver::Version::parse(v) {
            Ok(sv) => sv,
            Err(e) => {
                tracing::trace!(raw, error=%e, "not a v2 version");
                if let Some(field) = core_overflow(v) {
                    return Err(Error::overflow(raw, field));
                }
                return Err(Error::invalid(raw, e));
            }
        };

        Self::from_semver(raw, sv)
    }

    fn from_semver(raw: &str, sv: semver::Version) -> Result<Self> {

        let (rest, security) = split_security(raw, sv.build.as_str())?;
        let build = if rest.len() == sv.build.as_str().len() {
            sv.build.clone()
        } else if rest.is_empty() {
            BuildMetadata::EMPTY
        } else {
            BuildMetadata::new(rest).map_err(|e| Error::engine(raw, e))?
        };

        Ok(Self {
            major: sv.major,
            minor: sv.minor,
            patch: sv.patch,
            pre: sv.pre,
            build,
            security,
        })
    }

    /// The semver form, with the security counter folded back into the build metadata.
    pub fn to_semver(&self) -> Result<semver::Version> {

        let build = match (self.build.is_empty(), self.security) {
            (_, 0) => self.build.clone(),
            (true, n) => BuildMetadata::new(&format!("{SECURITY_IDENT}.{n}"))
                .map_err(|e| Error::engine(self.build.as_str(), e))?,
            (false, n) => BuildMetadata::new(&format!("{}.{SECURITY_IDENT}.{n}", self.build))
                .map_err(|e| Error::engine(self.build.as_str(), e))?,
        };

        Ok(semver::Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            pre: self.pre.clone(),
            build,
        })
    }

    pub fn prerelease(&self) -> &str {
        self.pre.as_str()
    }

    pub fn build_meta(&self) -> &str {
        self.build.as_str()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    pub fn is_security_release(&self) -> bool {
        self.security != 0
    }

    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Compare against a bare major.minor.patch release.
    ///
    /// A prerelease of the same triple is lesser, a security release of the same
    /// triple is greater.
    pub fn cmp_release(&self, major: u64, minor: u64, patch: u64) -> Ordering {
        match self.triple().cmp(&(major, minor, patch)) {
            Ordering::Equal => {
                if self.is_prerelease() {
                    Ordering::Less
                } else if self.is_security_release() {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            }
            ord => ord,
        }
    }

    // --- increments ----------------------------------------------------

    fn release(major: u64, minor: u64, patch: u64, pre: Option<Prerelease>) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: pre.unwrap_or(Prerelease::EMPTY),
            build: BuildMetadata::EMPTY,
            security: 0,
        }
    }

    fn bump(&self, n: u64, field: &'static str) -> Result<u64> {
        n.checked_add(1).ok_or_else(|| Error::overflow(self.to_string(), field))
    }

    pub fn increment(&self, which: Increment, pre: &str) -> Result<Self> {
        match which {
            Increment::Major => self.next_major(pre),
            Increment::Minor => self.next_minor(pre),
            Increment::Patch => self.next_patch(pre),
            Increment::Prerelease => self.next_prerelease(pre),
            Increment::Security => self.next_security(pre),
        }
    }

    pub fn next_major(&self, pre: &str) -> Result<Self> {
        let tag = prerelease_tag(pre)?;
        Ok(Self::release(self.bump(self.major, "major")?, 0, 0, tag))
    }

    pub fn next_minor(&self, pre: &str) -> Result<Self> {
        let tag = prerelease_tag(pre)?;
        Ok(Self::release(self.major, self.bump(self.minor, "minor")?, 0, tag))
    }

    /// 1.2.3-alpha -> 1.2.3, 1.2.3 -> 1.2.4, and with a tag always 1.2.4-tag
    pub fn next_patch(&self, pre: &str) -> Result<Self> {
        let tag = prerelease_tag(pre)?;
        if tag.is_none() && self.is_prerelease() {
            return Ok(Self::release(self.major, self.minor, self.patch, None));
        }
        Ok(Self::release(self.major, self.minor, self.bump(self.patch, "patch")?, tag))
    }

    /// 1.2.4 -> 1.2.5-0
    /// 1.2.3-alpha.9.beta -> 1.2.3-alpha.10.beta
    /// 1.2.3-alpha -> 1.2.3-alpha.0
    /// 1.2.3-alpha.0 with tag "dev" -> 1.2.3-dev
    pub fn next_prerelease(&self, pre: &str) -> Result<Self> {

        let tag = prerelease_tag(pre)?;

        if !self.is_prerelease() {
            let pre = match tag {
                Some(tag) => tag,
                None => Prerelease::new("0").map_err(|e| Error::engine("0", e))?,
            };
            return Ok(Self::release(self.major, self.minor, self.bump(self.patch, "patch")?, Some(pre)));
        }

        let mut idents: Vec<String> = self.pre.as_str().split('.').map(String::from).collect();

        if let Some(tag) = tag {
            if idents.first().map(String::as_str) != Some(tag.as_str()) {
                return Ok(Self::release(self.major, self.minor, self.patch, Some(tag)));
            }
        }

        match idents.iter().rposition(|id| is_numeric_ident(id)) {
            Some(idx) => {
                let n = idents[idx].parse::<u64>()
                    .ok()
                    .and_then(|n| n.checked_add(1))
                    .ok_or_else(|| Error::overflow(self.to_string(), "prerelease"))?;
                idents[idx] = n.to_string();
            }
            None => idents.push("0".into()),
        }

        let joined = idents.join(".");
        let pre = Prerelease::new(&joined).map_err(|e| Error::engine(joined.as_str(), e))?;
        Ok(Self::release(self.major, self.minor, self.patch, Some(pre)))
    }

    /// 1.2.3+build.5 -> 1.2.3+build.5.security.1
    pub fn next_security(&self, pre: &str) -> Result<Self> {
        prerelease_tag(pre)?;
        let mut next = self.clone();
        next.security = self.bump(self.security, "security")?;
        Ok(next)
    }
}

fn prerelease_tag(pre: &str) -> Result<Option<Prerelease>> {
    if pre.is_empty() {
        return Ok(None);
    }
    Prerelease::new(pre)
        .map(Some)
        .map_err(|e| Error::engine(pre, e))
}

impl PartialEq for VersionV2 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionV2 {}

impl PartialOrd for VersionV2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionV2 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
            .then_with(|| self.pre.cmp(&other.pre))
            .then_with(|| self.security.cmp(&other.security))
    }
}

impl std::str::FromStr for VersionV2 {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for VersionV2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        match (self.build.is_empty(), self.security) {
            (true, 0) => Ok(()),
            (false, 0) => write!(f, "+{}", self.build),
            (true, n) => write!(f, "+{SECURITY_IDENT}.{n}"),
            (false, n) => write!(f, "+{}.{SECURITY_IDENT}.{n}", self.build),
        }
    }
}
