//! Email canonicalization and format checks

use once_cell::sync::Lazy;
use regex::Regex;

/// Accepted address shape: `local@label(.label)*.tld`, case-insensitive.
///
/// Domain labels allow letters, digits and hyphens only; the final label is
/// alphabetic. Empty labels (`foo..com`, `foo.`) never match.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)\A[a-z0-9_+\-.]+@[a-z0-9\-]+(\.[a-z0-9\-]+)*\.[a-z]+\z").unwrap()
});

/// Canonical form of an email address, used for comparison and storage.
///
/// Lowercases the whole string; applying it twice yields the same value.
pub fn canonicalize_email(raw: &str) -> String {
    raw.to_lowercase()
}

/// Check whether an address matches the accepted email grammar
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_lowercases_everything() {
        assert_eq!(canonicalize_email("Foo@ExaMPle.Com"), "foo@example.com");
        assert_eq!(canonicalize_email("USER+TAG@FOO.ORG"), "user+tag@foo.org");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize_email("MiXeD@Case.Io");
        assert_eq!(canonicalize_email(&once), once);
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for address in [
            "user@foo,com",
            "user_at_foo.org",
            "example.user@foo.",
            "foo@bar_baz.com",
            "foo@bar+baz.com",
        ] {
            assert!(!is_valid_email(address), "{} should be rejected", address);
        }
    }

    #[test]
    fn test_accepts_well_formed_addresses() {
        for address in [
            "user@foo.COM",
            "A_US-ER@f.b.org",
            "frst.lst@foo.jp",
            "a+b@baz.cn",
        ] {
            assert!(is_valid_email(address), "{} should be accepted", address);
        }
    }

    #[test]
    fn test_rejects_empty_labels_and_whitespace() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("foo@bar..com"));
        assert!(!is_valid_email("foo@.com"));
        assert!(!is_valid_email("foo bar@baz.com"));
        assert!(!is_valid_email(" foo@bar.com"));
        assert!(!is_valid_email("foo@bar.c0m"));
    }
}
