use std::collections::BTreeSet;

use crate::services::auth::error::{AuthError, AuthErrorKind};
use crate::services::auth::verifier::VerifiedClaims;

/// Scope strings granted by a token (`"get:actors"`, `"delete:movies"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn contains(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Read the `permissions` claim.
///
/// Absent, not an array, or holding a non-string entry is `PermissionsNotFound`:
/// the token is genuine but the API was not set up to issue permissions.
pub fn extract_permissions(claims: &VerifiedClaims) -> Result<PermissionSet, AuthError> {
    let not_found = || AuthError::from(AuthErrorKind::PermissionsNotFound);

    let entries = claims
        .claims()
        .permissions
        .as_ref()
        .and_then(serde_json::Value::as_array)
        .ok_or_else(not_found)?;

    entries
        .iter()
        .map(|v| v.as_str().ok_or_else(not_found))
        .collect()
}
