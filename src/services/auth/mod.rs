pub mod error;
pub mod factory;
pub mod gate;
pub mod keys;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub mod testing;

pub use error::{AuthError, AuthErrorKind};
pub use factory::build_permission_gate;
pub use gate::PermissionGate;
pub use verifier::{TokenVerifier, VerifiedClaims, VerifierSettings};
