// Cross-scheme comparison
//
// One rule per pair of schemes. There is no single order shared by all three
// schemes, each pair is defined on its own:
//
// V1 vs V2
//   equal:   same (major, minor, patch), V1 tweak missing or 0, V2 not a prerelease,
//            V2 security 0
//   lesser:  V1 triple is lesser, or same triple with V1 tweak missing or 0 and V2 a
//            security release without prerelease
//   greater: everything else, e.g. V1 has a nonzero tweak, or V2 is a prerelease
//
// V1 vs Fallback, V2 vs Fallback
//   the canonical string of the V1/V2 value is read as a fallback version and
//   compared segment-wise

use crate::fallback::FallbackVersion;
use crate::v1::VersionV1;
use crate::v2::VersionV2;
use std::cmp::Ordering;

pub fn v1_eq_v2(left: &VersionV1, right: &VersionV2) -> bool {
    left.triple() == right.triple()
        && !left.has_nonzero_tweak()
        && !right.is_prerelease()
        && !right.is_security_release()
}

pub fn v1_lt_v2(left: &VersionV1, right: &VersionV2) -> bool {
    match left.triple().cmp(&right.triple()) {
        Ordering::Less => true,
        Ordering::Equal => {
            !left.has_nonzero_tweak()
                && !right.is_prerelease()
                && right.is_security_release()
        }
        Ordering::Greater => false,
    }
}

pub fn cmp_v1_v2(left: &VersionV1, right: &VersionV2) -> Ordering {
    if v1_eq_v2(left, right) {
        Ordering::Equal
    } else if v1_lt_v2(left, right) {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

pub fn cmp_v1_fallback(left: &VersionV1, right: &FallbackVersion) -> Ordering {
    FallbackVersion::cmp_canonical(&left.to_string(), right)
}

pub fn cmp_v2_fallback(left: &VersionV2, right: &FallbackVersion) -> Ordering {
    FallbackVersion::cmp_canonical(&left.to_string(), right)
}

#[cfg(test)]
mod test {
    use super::*;

    fn v1(s: &str) -> VersionV1 {
        VersionV1::parse(s).unwrap()
    }

    fn v2(s: &str) -> VersionV2 {
        VersionV2::parse(s).unwrap()
    }

    fn fb(s: &str) -> FallbackVersion {
        FallbackVersion::parse(s).unwrap()
    }

    #[test]
    fn v1_v2_equal() {
        assert!(v1_eq_v2(&v1("1.2.3"), &v2("1.2.3")));
        assert!(v1_eq_v2(&v1("1.2.3.0"), &v2("1.2.3")));
        assert!(v1_eq_v2(&v1("1.2.3"), &v2("1.2.3+build.7")));

        assert!(!v1_eq_v2(&v1("1.2.3"), &v2("1.2.3-alpha")));
        assert!(!v1_eq_v2(&v1("1.2.3"), &v2("1.2.3+security.1")));
        assert!(!v1_eq_v2(&v1("1.2.3.1"), &v2("1.2.3")));
        assert!(!v1_eq_v2(&v1("1.2.4"), &v2("1.2.3")));
    }

    #[test]
    fn v1_v2_security_bridge() {
        assert!(v1_lt_v2(&v1("1.2.3"), &v2("1.2.3+security.1")));
        assert!(v1_lt_v2(&v1("1.2.3.0"), &v2("1.2.3+security.1")));
        assert_eq!(cmp_v1_v2(&v1("1.2.3"), &v2("1.2.3+security.1")), Ordering::Less);

        // a nonzero tweak outranks the security release
        assert!(!v1_lt_v2(&v1("1.2.3.1"), &v2("1.2.3+security.1")));
        assert_eq!(cmp_v1_v2(&v1("1.2.3.1"), &v2("1.2.3+security.1")), Ordering::Greater);
    }

    #[test]
    fn v1_v2_same_triple_plain_release() {
        // no tweak, no prerelease, no security: equal and not greater
        let a = v1("1.2.3");
        let b = v2("1.2.3");
        assert!(v1_eq_v2(&a, &b));
        assert!(!v1_lt_v2(&a, &b));
        assert_eq!(cmp_v1_v2(&a, &b), Ordering::Equal);
    }

    #[test]
    fn v1_v2_table() {
        let table = [
            ("1.2.3", "1.2.3", Ordering::Equal),
            ("1.2.3", "1.2.4-rc1", Ordering::Less),
            ("1.2.3", "1.2.3-alpha", Ordering::Greater),
            ("1.2.3", "1.2.3-alpha+security.1", Ordering::Greater),
            ("1.2.3.1", "1.2.3", Ordering::Greater),
            ("1.2.3.1", "1.2.3-rc1", Ordering::Greater),
            ("1.2.3.999", "1.2.4-rc1", Ordering::Less),
            ("2.0.0", "1.99.99+security.9", Ordering::Greater),
        ];
        for (a, b, expected) in table {
            assert_eq!(cmp_v1_v2(&v1(a), &v2(b)), expected, "{a} vs {b}");
            // exactly one of ==, < holds, or neither (greater)
            let eq = v1_eq_v2(&v1(a), &v2(b));
            let lt = v1_lt_v2(&v1(a), &v2(b));
            assert!(!(eq && lt));
        }
    }

    #[test]
    fn bridged_through_fallback() {
        assert_eq!(cmp_v1_fallback(&v1("1.2.3"), &fb("1.2.3")), Ordering::Equal);
        assert_eq!(cmp_v1_fallback(&v1("1.2.3.0"), &fb("1.2.3")), Ordering::Equal);
        assert_eq!(cmp_v1_fallback(&v1("1.2.3"), &fb("1.2.10")), Ordering::Less);
        assert_eq!(cmp_v1_fallback(&v1("1.2.3.1"), &fb("1.2.3")), Ordering::Greater);
        assert_eq!(cmp_v1_fallback(&v1("1.2.3"), &fb("1.2.3.git")), Ordering::Less);

        assert_eq!(cmp_v2_fallback(&v2("1.2.3"), &fb("1.2.3")), Ordering::Equal);
        assert_eq!(cmp_v2_fallback(&v2("1.2.3"), &fb("1.2")), Ordering::Greater);
        assert_eq!(cmp_v2_fallback(&v2("v2.0.0"), &fb("10")), Ordering::Less);
        // "3-rc1" leads with 3, so it sorts below 4
        assert_eq!(cmp_v2_fallback(&v2("1.2.3-rc1"), &fb("1.2.4")), Ordering::Less);
        assert_eq!(cmp_v2_fallback(&v2("1.2.3-rc1"), &fb("1.2.4.git")), Ordering::Less);
        assert_eq!(cmp_v2_fallback(&v2("1.2.3-rc1"), &fb("1.2.3")), Ordering::Greater);
    }
}
