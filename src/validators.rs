use email_address::EmailAddress;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Returns `true` if the password meets the strength floor.
pub fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_LENGTH
}
