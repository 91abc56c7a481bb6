/// Factory: build the `PermissionGate` from application `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::keys::{JwksKeyResolver, KeyResolver, StaticKeyResolver};
use crate::services::auth::{PermissionGate, TokenVerifier, VerifierSettings};

pub fn build_permission_gate(config: &AuthConfig) -> Result<Arc<PermissionGate>, reqwest::Error> {
    let keys: Arc<dyn KeyResolver> = match &config.jwks_inline {
        Some(jwks) => {
            tracing::info!(keys = jwks.keys.len(), "using pinned signing keys");
            Arc::new(StaticKeyResolver::new(jwks.clone()))
        }
        None => Arc::new(JwksKeyResolver::new(
            config.jwks_url.clone(),
            config.jwks_fetch_timeout,
            config.jwks_cache_ttl,
        )?),
    };

    let verifier = TokenVerifier::new(VerifierSettings::from(config), keys);

    Ok(Arc::new(PermissionGate::new(verifier)))
}
