use std::str::FromStr;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::services::auth::error::{AuthError, AuthErrorKind};
use crate::services::auth::keys::KeyResolver;

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Access token payload as issued by the identity provider.
///
/// `permissions` stays raw JSON: a token with a malformed permissions claim
/// is still a valid token, and the claims extractor reports it separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    // machine-to-machine tokens may omit it
    #[serde(default)]
    pub sub: String,
    pub aud: Audience,
    #[serde(deserialize_with = "numeric_date")]
    pub exp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<serde_json::Value>,
}

/// NumericDate: seconds since the epoch, possibly fractional. Truncated to whole seconds.
fn numeric_date<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(de::Error::custom("NumericDate must be a non-negative number"));
    }
    Ok(secs as u64)
}

/// Claims that passed signature, issuer, audience and expiry checks.
///
/// Only `TokenVerifier` can build one.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedClaims(Claims);

impl VerifiedClaims {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn subject(&self) -> &str {
        &self.0.sub
    }
}

#[derive(Debug, Clone)]
pub struct VerifierSettings {
    pub issuer: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
}

impl From<&AuthConfig> for VerifierSettings {
    fn from(config: &AuthConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            algorithms: config.algorithms.clone(),
            leeway_seconds: config.leeway_seconds,
        }
    }
}

// Header fields we act on before any cryptographic work.
#[derive(Debug, Deserialize)]
struct JoseHeader {
    alg: String,
    #[serde(default)]
    kid: Option<String>,
}

/// Bearer-token verifier (JWS compact serialization).
#[derive(Clone)]
pub struct TokenVerifier {
    settings: VerifierSettings,
    keys: Arc<dyn KeyResolver>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(settings: VerifierSettings, keys: Arc<dyn KeyResolver>) -> Self {
        Self { settings, keys }
    }

    /// Verify against the current wall clock.
    pub async fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.verify_at(token, now).await
    }

    /// Verify as of `now` (unix seconds).
    ///
    /// Checks, cheapest first; the first failure wins:
    /// - shape: three non-empty dot-separated segments
    /// - header: allowed `alg`, then present `kid`
    /// - key: resolved by `kid`
    /// - signature, then `iss` (exact), then `aud` (contains)
    /// - expiry: expired once `now >= exp + leeway`
    pub async fn verify_at(&self, token: &str, now: u64) -> Result<VerifiedClaims, AuthError> {
        let header = self.parse_header(token)?;
        let alg = self.accepted_algorithm(&header.alg)?;

        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| AuthError::new(AuthErrorKind::MalformedToken, "Token has no key id."))?;

        let key = self.keys.resolve(kid).await?;

        // exp is enforced below with an exclusive boundary
        let mut validation = Validation::new(alg);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.set_issuer(&[self.settings.issuer.as_str()]);
        validation.set_audience(&[self.settings.audience.as_str()]);

        // Decode as raw JSON first so missing iss/aud/exp surface as claim errors,
        // not as deserialization errors.
        let data = jsonwebtoken::decode::<serde_json::Value>(token, &key, &validation)
            .map_err(map_jwt_error)?;
        let claims: Claims = serde_json::from_value(data.claims).map_err(|err| {
            tracing::debug!(error = %err, "verified token has unusable claims");
            AuthError::from(AuthErrorKind::MalformedToken)
        })?;

        if now >= claims.exp.saturating_add(self.settings.leeway_seconds) {
            return Err(AuthErrorKind::TokenExpired.into());
        }

        Ok(VerifiedClaims(claims))
    }

    fn parse_header(&self, token: &str) -> Result<JoseHeader, AuthError> {
        let malformed = || AuthError::from(AuthErrorKind::MalformedToken);

        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(malformed());
        }

        let raw = URL_SAFE_NO_PAD
            .decode(segments[0])
            .map_err(|_| malformed())?;

        serde_json::from_slice(&raw).map_err(|_| malformed())
    }

    fn accepted_algorithm(&self, alg: &str) -> Result<Algorithm, AuthError> {
        match Algorithm::from_str(alg) {
            Ok(alg) if self.settings.algorithms.contains(&alg) => Ok(alg),
            _ => Err(AuthError::new(
                AuthErrorKind::UnsupportedAlgorithm,
                format!("Token algorithm '{alg}' is not accepted."),
            )),
        }
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    let kind = match err.kind() {
        ErrorKind::InvalidSignature => AuthErrorKind::InvalidSignature,
        ErrorKind::InvalidIssuer => AuthErrorKind::InvalidIssuer,
        ErrorKind::InvalidAudience => AuthErrorKind::InvalidAudience,
        ErrorKind::ExpiredSignature => AuthErrorKind::TokenExpired,
        ErrorKind::MissingRequiredClaim(claim) => match claim.as_str() {
            "iss" => AuthErrorKind::InvalidIssuer,
            "aud" => AuthErrorKind::InvalidAudience,
            "exp" => AuthErrorKind::TokenExpired,
            _ => AuthErrorKind::MalformedToken,
        },
        ErrorKind::InvalidAlgorithm => AuthErrorKind::UnsupportedAlgorithm,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
            AuthErrorKind::MalformedToken
        }
        // key/algorithm family mismatch and other crypto failures
        _ => AuthErrorKind::InvalidSignature,
    };

    tracing::debug!(error = %err, kind = kind.code(), "jwt decode rejected token");
    kind.into()
}
