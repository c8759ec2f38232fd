//! Email syntax check

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Non-whitespace local part, `@`, and a dotted domain
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Loose syntactic email check; deliverability is not verified
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in [
            "a@b.com",
            "first.last@example.co.uk",
            "user+tag@sub.domain.io",
            "x@y.z",
        ] {
            assert!(is_valid_email(email), "{} should be valid", email);
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "not-an-email",
            "missing-domain@",
            "@example.com",
            "no-dot@example",
            "two@@example.com",
            "a@b.",
            "a@.com.",
            "spaces in@example.com",
            "a@exa mple.com",
            " a@b.com",
            "",
        ] {
            assert!(!is_valid_email(email), "{:?} should be invalid", email);
        }
    }

    #[test]
    fn test_strings_without_at_or_dot_rejected() {
        // Anything lacking an `@`, or a `.` after it, cannot match
        let samples = ["plainaddress", "user.name", "user@localhost", "a.b.c@d"];
        for email in samples {
            assert!(!is_valid_email(email), "{:?} should be invalid", email);
        }
    }
}
