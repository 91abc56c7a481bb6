use axum::http::StatusCode;
use thiserror::Error;

/// Why an access check failed.
///
/// Each kind has a stable wire code and a fixed HTTP status; the boundary
/// layer renders both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    AuthHeaderMissing,
    InvalidHeaderFormat,
    MalformedToken,
    UnsupportedAlgorithm,
    KeyNotFound,
    KeyResolutionFailed,
    InvalidSignature,
    InvalidIssuer,
    InvalidAudience,
    TokenExpired,
    PermissionsNotFound,
    PermissionDenied,
}

impl AuthErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::AuthHeaderMissing => "authorization_header_missing",
            Self::InvalidHeaderFormat => "invalid_header",
            Self::MalformedToken => "malformed_token",
            Self::UnsupportedAlgorithm => "unsupported_algorithm",
            Self::KeyNotFound => "key_not_found",
            Self::KeyResolutionFailed => "key_resolution_failed",
            Self::InvalidSignature => "invalid_signature",
            Self::InvalidIssuer => "invalid_issuer",
            Self::InvalidAudience => "invalid_audience",
            Self::TokenExpired => "token_expired",
            Self::PermissionsNotFound => "invalid_claims",
            Self::PermissionDenied => "unauthorized",
        }
    }

    /// 401 for "who are you", 400 for a token minted without permissions,
    /// 403 for "known caller, missing permission".
    pub fn status(self) -> StatusCode {
        match self {
            Self::PermissionsNotFound => StatusCode::BAD_REQUEST,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::AuthHeaderMissing => "Authorization header is expected.",
            Self::InvalidHeaderFormat => "Authorization header must be a bearer token.",
            Self::MalformedToken => "Unable to parse authentication token.",
            Self::UnsupportedAlgorithm => "Token signing algorithm is not accepted.",
            Self::KeyNotFound => "Unable to find the appropriate key.",
            Self::KeyResolutionFailed => "Unable to fetch signing keys.",
            Self::InvalidSignature => "Token signature is invalid.",
            Self::InvalidIssuer => "Incorrect claims. Please, check the issuer.",
            Self::InvalidAudience => "Incorrect claims. Please, check the audience.",
            Self::TokenExpired => "Token expired.",
            Self::PermissionsNotFound => "Permissions not included in JWT.",
            Self::PermissionDenied => "Permission not found.",
        }
    }
}

/// A failed access check: kind + client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", kind.code())]
pub struct AuthError {
    kind: AuthErrorKind,
    message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl From<AuthErrorKind> for AuthError {
    fn from(kind: AuthErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AuthError::from(AuthErrorKind::AuthHeaderMissing).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::from(AuthErrorKind::TokenExpired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::from(AuthErrorKind::PermissionsNotFound).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::from(AuthErrorKind::PermissionDenied).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = AuthError::from(AuthErrorKind::TokenExpired);
        assert_eq!(err.to_string(), "token_expired: Token expired.");
    }
}
