//! Input checks shared by the account service and the CLI.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::constants::{MIN_PASSWORD_LENGTH, USERNAME_LENGTH};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("Invalid regex pattern defined in code")
    })
}

/// `local@domain.tld` with no characters outside the usual address set.
#[must_use]
pub fn valid_email_address(email: &str) -> bool {
    !email.is_empty() && email_regex().is_match(email)
}

/// Password is at least [`MIN_PASSWORD_LENGTH`] characters and matches its
/// confirmation.
#[must_use]
pub fn check_valid_password(password: &str, confirm: &str) -> bool {
    check_password_policy(password, confirm, MIN_PASSWORD_LENGTH)
}

/// Same as [`check_valid_password`] with a configurable minimum. The minimum
/// never drops below [`MIN_PASSWORD_LENGTH`].
#[must_use]
pub fn check_password_policy(password: &str, confirm: &str, min_length: usize) -> bool {
    let min_length = min_length.max(MIN_PASSWORD_LENGTH);
    !password.is_empty() && password.chars().count() >= min_length && password == confirm
}

/// Username derived from an email address.
///
/// Only a uniqueness key: an unsalted digest must never be used to store
/// passwords.
#[must_use]
pub fn username_digest(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    let mut username = hex::encode(digest);
    username.truncate(USERNAME_LENGTH);
    username
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(!valid_email_address(""));
        assert!(!valid_email_address("testmail.cu"));
        assert!(!valid_email_address("testmail%$#.com"));
        assert!(!valid_email_address("test@#.com"));
        assert!(!valid_email_address("i like cats"));
        assert!(!valid_email_address("test@localhost"));
        assert!(!valid_email_address("@mail.com"));
        assert!(valid_email_address("test@mail.com"));
        assert!(valid_email_address("first.last+tag@sub.example.org"));
    }

    #[test]
    fn test_valid_password() {
        let too_short = "short";
        let blank = "";
        let valid = "qwerty123";

        assert!(!check_valid_password(too_short, too_short));
        assert!(!check_valid_password(blank, blank));
        assert!(!check_valid_password(too_short, "blah"));
        assert!(!check_valid_password(blank, "asdf"));
        assert!(!check_valid_password(valid, "qwerty124"));
        assert!(check_valid_password(valid, valid));
        assert!(check_valid_password("exactly8", "exactly8"));
        assert!(!check_valid_password("seven77", "seven77"));
    }

    #[test]
    fn test_password_policy_cannot_be_weakened() {
        assert!(!check_password_policy("abc", "abc", 2));
        assert!(!check_password_policy("qwerty123", "qwerty123", 12));
        assert!(check_password_policy("qwerty123456", "qwerty123456", 12));
    }

    #[test]
    fn test_username_digest() {
        let first = username_digest("bob@bob.com");
        assert_eq!(first.len(), USERNAME_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(first, username_digest("bob@bob.com"));
        assert_ne!(first, username_digest("alice@bob.com"));
    }
}
