//! Form validation shared by the login and registration pages.

pub const MIN_PASSWORD_LEN: usize = 8;

/// Check an email address, returning the user-facing message on failure.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Please enter a valid email");
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err("Please enter a valid email");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

pub fn validate_required(value: &str, message: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        Err(message)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("amina@example.com").is_ok());
        assert!(validate_email("  amina@example.com ").is_ok());
        assert!(validate_email("amina").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("amina@localhost").is_err());
        assert!(validate_email("amina@example.").is_err());
    }

    #[test]
    fn test_password() {
        assert!(validate_password("12345678").is_ok());
        assert_eq!(
            validate_password("short"),
            Err("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_required() {
        assert_eq!(validate_required("  ", "Name is required"), Err("Name is required"));
        assert!(validate_required("Amina", "Name is required").is_ok());
    }
}
