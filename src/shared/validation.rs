use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for ad placement identifiers (`position`, `displayPlace`)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "home", "top", "sidebar-right", "post-detail"
    /// - Invalid: "-home", "home-", "home--top", "Home", "home_top"
    pub static ref SLOT_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for one-time registration codes (six digits)
    pub static ref OTP_REGEX: Regex = Regex::new(r"^[0-9]{6}$").unwrap();

    /// Regex for profile phone numbers: 8-15 digits with an optional leading '+'
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{8,15}$").unwrap();
}

/// Trimmed, non-empty copy of an optional free-text field
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Canonical form used for storing and comparing e-mail addresses
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_regex_valid() {
        assert!(SLOT_REGEX.is_match("home"));
        assert!(SLOT_REGEX.is_match("top"));
        assert!(SLOT_REGEX.is_match("sidebar-right"));
        assert!(SLOT_REGEX.is_match("post-detail-2"));
    }

    #[test]
    fn test_slot_regex_invalid() {
        assert!(!SLOT_REGEX.is_match("-home")); // starts with hyphen
        assert!(!SLOT_REGEX.is_match("home-")); // ends with hyphen
        assert!(!SLOT_REGEX.is_match("home--top")); // double hyphen
        assert!(!SLOT_REGEX.is_match("Home")); // uppercase
        assert!(!SLOT_REGEX.is_match("home_top")); // underscore
        assert!(!SLOT_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_otp_regex() {
        assert!(OTP_REGEX.is_match("012345"));
        assert!(!OTP_REGEX.is_match("12345"));
        assert!(!OTP_REGEX.is_match("12a456"));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("0901234567"));
        assert!(PHONE_REGEX.is_match("+84901234567"));
        assert!(!PHONE_REGEX.is_match("090-123-4567"));
        assert!(!PHONE_REGEX.is_match("1234"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ban.Doc@Example.COM "), "ban.doc@example.com");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  spam ")), Some("spam".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
