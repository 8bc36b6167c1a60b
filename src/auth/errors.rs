//! # Auth Errors
//!
//! Error types for request authentication.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No bearer credential on a route that needs one
    #[error("Authentication credentials were not provided.")]
    MissingCredentials,

    /// Malformed token, bad signature, wrong issuer or audience
    #[error("Invalid token.")]
    InvalidToken,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingCredentials => 401,
            AuthError::InvalidToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::TokenGenerationFailed => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::MissingCredentials.status_code(), 401);
        assert_eq!(AuthError::TokenExpired.status_code(), 401);
        assert_eq!(AuthError::TokenGenerationFailed.status_code(), 500);
    }

    #[test]
    fn test_messages_are_client_facing() {
        assert_eq!(
            AuthError::MissingCredentials.to_string(),
            "Authentication credentials were not provided."
        );
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token.");
    }
}
