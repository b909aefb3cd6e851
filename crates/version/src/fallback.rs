// Fallback versions
//
// Anything that is neither V2 nor V1: the string is split on '.' and empty parts are
// dropped. Comparison walks the parts pairwise, a missing part counts as "0".
//
// Each part is read as alternating runs of digits and non-digits, "3-rc1" is
// (3, "-rc", 1). Runs are compared pairwise:
//
// - digit runs are compared numerically (leading zeros ignored)
// - other runs are compared in ASCII order
// - a digit run is lesser than a non-digit run
// - a part with fewer runs is lesser when all shared runs are equal
//
// example: 1.9 < 1.10
//          1.a < 1.b
//          1 == 1.0 == 1.00
//          1.2 < 1.2.rc1
//          1.3-rc1 < 1.4
//          1.2 < 1.10a

use crate::error::{Error, Result};
use std::cmp::Ordering;

const MISSING_SEGMENT: &str = "0";

#[derive(Debug, Clone)]
pub struct FallbackVersion {
    segments: Vec<String>,
}

// numeric compare without a width limit
fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

// "3-rc1" -> [Digits("3"), Text("-rc"), Digits("1")]
fn runs(s: &str) -> impl Iterator<Item = Run<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(if digits { Run::Digits(run) } else { Run::Text(run) })
    })
}

fn run_cmp(a: &Run, b: &Run) -> Ordering {
    match (a, b) {
        (Run::Digits(a), Run::Digits(b)) => numeric_cmp(a, b),
        (Run::Digits(_), Run::Text(_)) => Ordering::Less,
        (Run::Text(_), Run::Digits(_)) => Ordering::Greater,
        (Run::Text(a), Run::Text(b)) => a.cmp(b),
    }
}

fn segment_cmp(a: &str, b: &str) -> Ordering {
    let mut left = runs(a);
    let mut right = runs(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => match run_cmp(&l, &r) {
                Ordering::Equal => {}
                ord => return ord,
            },
        }
    }
}

fn split_segments(raw: &str) -> impl Iterator<Item = &str> + Clone {
    raw.split('.').filter(|s| !s.is_empty())
}

fn segments_cmp<'l, 'r, L, R>(left: L, right: R) -> Ordering
where
    L: Iterator<Item = &'l str> + Clone,
    R: Iterator<Item = &'r str> + Clone,
{
    let count = std::cmp::max(left.clone().count(), right.clone().count());

    let left = left.chain(std::iter::repeat(MISSING_SEGMENT)).take(count);
    let right = right.chain(std::iter::repeat(MISSING_SEGMENT)).take(count);

    for (l, r) in std::iter::zip(left, right) {
        match segment_cmp(l, r) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }

    Ordering::Equal
}

impl FallbackVersion {

    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<String> = split_segments(raw).map(String::from).collect();
        if segments.is_empty() {
            return Err(Error::empty(raw));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn iter(&self) -> impl Iterator<Item = &str> + Clone {
        self.segments.iter().map(String::as_str)
    }

    /// Three-way segment compare.
    pub fn compare(&self, other: &Self) -> Ordering {
        segments_cmp(self.iter(), other.iter())
    }

    /// Compare against the canonical string of a version from another scheme.
    /// The string is read with the fallback rules, an empty string is reported as an
    /// error rather than an ordering.
    pub fn compare_str(&self, raw: &str) -> Result<Ordering> {
        if split_segments(raw).next().is_none() {
            return Err(Error::empty(raw));
        }
        Ok(segments_cmp(self.iter(), split_segments(raw)))
    }

    /// Compare a canonical string (known to be non-empty) against this version.
    pub(crate) fn cmp_canonical(canonical: &str, other: &Self) -> Ordering {
        segments_cmp(split_segments(canonical), other.iter())
    }
}

impl PartialEq for FallbackVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for FallbackVersion {}

impl PartialOrd for FallbackVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FallbackVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl std::str::FromStr for FallbackVersion {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for FallbackVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    fn fb(s: &str) -> FallbackVersion {
        FallbackVersion::parse(s).unwrap()
    }

    #[test]
    fn parse() {
        assert_eq!(fb("1.2.3").segments(), ["1", "2", "3"]);
        assert_eq!(fb("..1..a.").segments(), ["1", "a"]);
        assert_eq!(fb("2024-01-01").segments(), ["2024-01-01"]);

        for s in ["", ".", "...."] {
            let err = FallbackVersion::parse(s).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyInput);
            assert_eq!(err.raw(), s);
        }
    }

    #[test]
    fn round_trip() {
        for s in ["1", "1.a", "1.2.3.4.5.6", "2.0-beta.1", "r1234", "1.02"] {
            assert_eq!(fb(s).to_string(), s);
            assert_eq!(fb(&fb(s).to_string()).segments(), fb(s).segments());
        }
    }

    #[test]
    fn numeric_segments() {
        assert!(fb("1.9") < fb("1.10"));
        assert!(fb("1.10") > fb("1.9"));
        assert!(fb("1.99999999999999999999") < fb("1.100000000000000000000"));
        assert_eq!(fb("1.01"), fb("1.1"));
    }

    #[test]
    fn mixed_segments() {
        assert!(fb("1.a") < fb("1.b"));
        assert!(fb("1.A") < fb("1.a"));
        assert!(fb("1.2") < fb("1.a"));
        assert!(fb("1.1a") < fb("1.10"));
        assert!(fb("1.2") < fb("1.10a"));
        assert!(fb("1.10") < fb("1.10a"));
        assert!(fb("1.3-rc1") < fb("1.4"));
        assert!(fb("1.3") < fb("1.3-rc1"));
        assert_eq!(fb("1.3-rc01"), fb("1.3-rc1"));
    }

    #[test]
    fn missing_segments() {
        assert_eq!(fb("1"), fb("1.0"));
        assert_eq!(fb("1").compare(&fb("1.0.0")), Ordering::Equal);
        assert!(fb("1") < fb("1.1"));
        assert!(fb("1") < fb("1.rc1"));
        assert!(fb("1.2.3") > fb("1.2"));
    }

    #[test]
    fn compare_str() {
        let v = fb("1.2.3");
        assert_eq!(v.compare_str("1.2.3"), Ok(Ordering::Equal));
        assert_eq!(v.compare_str("1.2.3.0"), Ok(Ordering::Equal));
        assert_eq!(v.compare_str("1.2.4"), Ok(Ordering::Less));
        assert_eq!(v.compare_str("1.2"), Ok(Ordering::Greater));

        // an unusable operand is an error, not "not equal"
        assert_eq!(v.compare_str("").unwrap_err().kind(), ErrorKind::EmptyInput);
        assert_eq!(v.compare_str("..").unwrap_err().kind(), ErrorKind::EmptyInput);
    }

    fn assert_order(versions: &[&str]) {
        for (i, a) in versions.iter().enumerate() {
            assert_eq!(fb(a).compare(&fb(a)), Ordering::Equal);
            for b in versions.iter().skip(i + 1) {
                assert_eq!(fb(a).compare(&fb(b)), Ordering::Less, "{a} < {b}");
                assert_eq!(fb(b).compare(&fb(a)), Ordering::Greater, "{b} > {a}");
            }
        }
    }

    #[test]
    fn order() {
        assert_order(&[
            "0.1",
            "1",
            "1.0.1",
            "1.2",
            "1.2.rc1",
            "1.9",
            "1.10",
            "1.10a",
            "1.A",
            "1.a",
            "1.b",
            "2",
            "2.0-beta",
            "10",
            "a",
            "b.1",
        ]);
    }

    #[test]
    fn transitive_over_mixed_parts() {
        // compared as whole strings these three form a cycle
        let a = fb("2");
        let b = fb("10");
        let c = fb("1b");
        assert!(c < a);
        assert!(a < b);
        assert!(c < b);
    }
}
