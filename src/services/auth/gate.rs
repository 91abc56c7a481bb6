//! Permission gate: `Authorization` header → verified claims → permission check.
//!
//! Per request, stateless:
//! `NoToken → HeaderParsed → SignatureVerified → ClaimsValid → PermissionChecked → Authorized`,
//! with any step able to end in `Denied(kind)`.
use std::future::Future;

use crate::services::auth::error::{AuthError, AuthErrorKind};
use crate::services::auth::permissions::extract_permissions;
use crate::services::auth::verifier::{TokenVerifier, VerifiedClaims};

/// Split `Bearer <token>`.
///
/// - `None` → `AuthHeaderMissing`
/// - anything but exactly two whitespace-separated parts with a `bearer`
///   scheme (any case) → `InvalidHeaderFormat`
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthErrorKind::AuthHeaderMissing)?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::new(
            AuthErrorKind::InvalidHeaderFormat,
            "Authorization header must start with \"Bearer\".",
        )),
        (Some(_), None, _) => Err(AuthError::new(
            AuthErrorKind::InvalidHeaderFormat,
            "Token not found.",
        )),
        _ => Err(AuthErrorKind::InvalidHeaderFormat.into()),
    }
}

#[derive(Debug, Clone)]
pub struct PermissionGate {
    verifier: TokenVerifier,
}

impl PermissionGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Run the whole chain and return the verified claims when `required`
    /// is granted.
    pub async fn authorize(
        &self,
        header: Option<&str>,
        required: &str,
    ) -> Result<VerifiedClaims, AuthError> {
        let token = parse_bearer(header)?;
        let claims = self.verifier.verify(token).await?;
        let permissions = extract_permissions(&claims)?;

        if !permissions.contains(required) {
            return Err(AuthErrorKind::PermissionDenied.into());
        }

        Ok(claims)
    }

    /// Invoke `op` with the verified claims, or fail without invoking it.
    pub async fn guard<F, Fut, T>(
        &self,
        header: Option<&str>,
        required: &str,
        op: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(VerifiedClaims) -> Fut,
        Fut: Future<Output = T>,
    {
        match self.authorize(header, required).await {
            Ok(claims) => {
                tracing::debug!(sub = claims.subject(), permission = required, "access granted");
                Ok(op(claims).await)
            }
            Err(err) => {
                tracing::warn!(
                    kind = err.kind().code(),
                    permission = required,
                    error = %err,
                    "access denied"
                );
                Err(err)
            }
        }
    }
}
