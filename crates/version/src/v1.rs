// V1 versions
//
// Strict dotted numbers: major.minor.patch with an optional fourth "tweak" number.
// No leading zeros except a literal 0.
//
// example: 1.2.3
//          1.2.3.4
//
// Equality is structural: 1.2.3.0 != 1.2.3 because only one of them has a tweak.
// Precedence normalizes a missing tweak to 0, so the two above have the same
// precedence and neither is less than the other.

use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

const V1_PATTERN: &str = r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(?:\.(0|[1-9][0-9]*))?$";

fn v1_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(V1_PATTERN).expect("V1 pattern is a valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionV1 {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub tweak: Option<u64>,
}

impl VersionV1 {

    pub fn new(major: u64, minor: u64, patch: u64, tweak: Option<u64>) -> Self {
        Self { major, minor, patch, tweak }
    }

    pub fn parse(raw: &str) -> Result<Self> {

        let caps = v1_regex().captures(raw).ok_or_else(|| {
            Error::invalid(raw, "expected major.minor.patch or major.minor.patch.tweak")
        })?;

        let field = |idx: usize, name: &'static str| -> Result<Option<u64>> {
            match caps.get(idx) {
                None => Ok(None),
                Some(m) => m.as_str().parse::<u64>()
                    .map(Some)
                    .map_err(|_| Error::overflow(raw, name)),
            }
        };

        // the first three groups are not optional in the pattern
        let major = field(1, "major")?.unwrap_or_default();
        let minor = field(2, "minor")?.unwrap_or_default();
        let patch = field(3, "patch")?.unwrap_or_default();
        let tweak = field(4, "tweak")?;

        Ok(Self { major, minor, patch, tweak })
    }

    pub fn has_tweak(&self) -> bool {
        self.tweak.is_some()
    }

    /// tweak that is present and not zero
    pub fn has_nonzero_tweak(&self) -> bool {
        self.tweak.unwrap_or(0) != 0
    }

    pub fn clear_tweak(&mut self) {
        self.tweak = None;
    }

    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    fn normalized(&self) -> (u64, u64, u64, u64) {
        (self.major, self.minor, self.patch, self.tweak.unwrap_or(0))
    }

    /// Total order over all V1 values, a missing tweak counts as 0.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }
}

impl PartialOrd for VersionV1 {
    // None when the precedence is equal but tweak presence differs
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.cmp_precedence(other) {
            Ordering::Equal if self != other => None,
            ord => Some(ord),
        }
    }
}

impl std::str::FromStr for VersionV1 {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for VersionV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(tweak) = self.tweak {
            write!(f, ".{tweak}")?;
        }
        Ok(())
    }
}
