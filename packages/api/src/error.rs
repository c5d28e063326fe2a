//! Error types for calls to the backend.

use thiserror::Error;

/// Failure of a non-auth backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Network faults and 5xx responses; worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Failure of a login or registration call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    DuplicateEmail,
    #[error("{0}")]
    Validation(String),
    #[error("Could not reach the server: {0}")]
    Network(String),
    #[error("{0}")]
    Other(String),
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Network(msg) => AuthError::Network(msg),
            other => AuthError::Other(other.to_string()),
        }
    }
}

/// Map a failed `POST /auth/login` response.
pub(crate) fn classify_login_failure(status: u16, message: String) -> AuthError {
    match status {
        401 => AuthError::InvalidCredentials,
        _ => AuthError::Other(fallback_message(status, message)),
    }
}

/// Map a failed `POST /auth/register` or `/auth/register-doctor` response.
pub(crate) fn classify_registration_failure(status: u16, message: String) -> AuthError {
    if status == 400 {
        let lower = message.to_lowercase();
        if lower.contains("email") && (lower.contains("exist") || lower.contains("already")) {
            return AuthError::DuplicateEmail;
        }
        if lower.contains("missing") || lower.contains("required") {
            return AuthError::Validation(message);
        }
    }
    AuthError::Other(fallback_message(status, message))
}

fn fallback_message(status: u16, message: String) -> String {
    if message.trim().is_empty() {
        format!("Request failed with status {status}")
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_401_is_invalid_credentials() {
        assert_eq!(
            classify_login_failure(401, "Unauthorized".into()),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_login_other_statuses_are_generic() {
        assert_eq!(
            classify_login_failure(400, "Email already exists".into()),
            AuthError::Other("Email already exists".into())
        );
        assert_eq!(
            classify_login_failure(502, String::new()),
            AuthError::Other("Request failed with status 502".into())
        );
    }

    #[test]
    fn test_registration_duplicate_email() {
        assert_eq!(
            classify_registration_failure(400, "User with this email already exists".into()),
            AuthError::DuplicateEmail
        );
        assert_eq!(
            classify_registration_failure(400, "Email exists".into()),
            AuthError::DuplicateEmail
        );
    }

    #[test]
    fn test_registration_missing_fields() {
        assert_eq!(
            classify_registration_failure(400, "Missing required fields: licenseNumber".into()),
            AuthError::Validation("Missing required fields: licenseNumber".into())
        );
    }

    #[test]
    fn test_registration_other() {
        assert_eq!(
            classify_registration_failure(500, "boom".into()),
            AuthError::Other("boom".into())
        );
        // Only 400s are inspected
        assert_eq!(
            classify_registration_failure(409, "email already exists".into()),
            AuthError::Other("email already exists".into())
        );
    }

    #[test]
    fn test_transient() {
        assert!(ApiError::Network("refused".into()).is_transient());
        assert!(ApiError::Status { status: 503, message: String::new() }.is_transient());
        assert!(!ApiError::Status { status: 404, message: String::new() }.is_transient());
        assert!(!ApiError::Decode("bad".into()).is_transient());
    }
}
