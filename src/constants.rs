/// Passwords shorter than this are always rejected.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of the hex username derived from an email.
pub const USERNAME_LENGTH: usize = 30;

pub mod session {

    pub const USER_ID_KEY: &str = "user_id";
}

pub mod routes {

    /// Where logout and deactivation send the browser.
    pub const HOME: &str = "/";
}
