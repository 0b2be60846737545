use crate::error::{ClientError, Result};

/// Validates a phone number in international format.
///
/// # Arguments
///
/// * `phone_number` - The phone number to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the phone number is valid.
pub fn validate_phone_number(phone_number: &str) -> Result<()> {
    let Some(digits) = phone_number.strip_prefix('+') else {
        return Err(ClientError::Validation(
            "Phone number must start with the country code (+)".to_string(),
        ));
    };

    if digits.len() < 8 || digits.len() > 15 {
        return Err(ClientError::Validation(
            "Phone number must have between 8 and 15 digits".to_string(),
        ));
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::Validation(
            "Phone number can only contain digits after the country code".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(ClientError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(ClientError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a password and its confirmation match.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(ClientError::Validation(
            "Passwords do not match".to_string(),
        ));
    }
    Ok(())
}

/// Validates a visitor name.
pub fn validate_visitor_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ClientError::Validation(
            "Visitor name cannot be empty".to_string(),
        ));
    }

    if name.len() > 255 {
        return Err(ClientError::Validation(
            "Visitor name must be at most 255 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates an access grant duration, bounded at one week.
pub fn validate_duration_minutes(duration_minutes: i64) -> Result<()> {
    if duration_minutes <= 0 {
        return Err(ClientError::Validation(
            "Duration must be positive".to_string(),
        ));
    }

    if duration_minutes > 7 * 24 * 60 {
        return Err(ClientError::Validation(
            "Duration cannot exceed one week".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_international_phone_numbers() {
        assert!(validate_phone_number("+221771234567").is_ok());
        assert!(validate_phone_number("+33612345678").is_ok());
    }

    #[test]
    fn rejects_malformed_phone_numbers() {
        assert!(validate_phone_number("771234567").is_err());
        assert!(validate_phone_number("+221 77 123").is_err());
        assert!(validate_phone_number("+12").is_err());
        assert!(validate_phone_number("+1234567890123456").is_err());
    }

    #[test]
    fn rejects_short_passwords() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn rejects_mismatched_confirmation() {
        assert!(validate_password_confirmation("secret123", "secret123").is_ok());
        assert!(validate_password_confirmation("secret123", "secret124").is_err());
    }

    #[test]
    fn rejects_empty_visitor_name_and_bad_durations() {
        assert!(validate_visitor_name("  ").is_err());
        assert!(validate_visitor_name("Moussa Diop").is_ok());
        assert!(validate_duration_minutes(0).is_err());
        assert!(validate_duration_minutes(60).is_ok());
        assert!(validate_duration_minutes(20000).is_err());
    }
}
