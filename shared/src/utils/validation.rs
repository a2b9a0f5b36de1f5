//! Loose sanity checks for contact details.
//!
//! These are intentionally permissive and do not implement RFC 5322 or E.164.
//! Tightening them is a product decision, not a fix.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern is valid"));

/// `local@domain.tld` shaped, with no whitespace anywhere
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Up to 16 digits, optional leading `+`, first digit non-zero.
/// Whitespace is ignored.
pub fn is_valid_phone_number(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE.is_match(&compact)
}
