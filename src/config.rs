/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use jsonwebtoken::jwk::JwkSet;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identity-provider settings used to verify access tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub domain: String,
    pub issuer: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    pub jwks_url: Url,
    // pinned key set; when present no JWKS is fetched
    pub jwks_inline: Option<JwkSet>,
    pub jwks_cache_ttl: Duration,
    pub jwks_fetch_timeout: Duration,
    pub leeway_seconds: u64,

    // used only to build the login redirect
    pub client_id: String,
    pub callback_url: String,
}

impl AuthConfig {
    /// `https://<domain>/authorize?...` for the implicit-grant login flow.
    pub fn authorize_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&format!("https://{}/authorize", self.domain))
            .map_err(|_| ConfigError::Invalid("AUTH_DOMAIN"))?;

        url.query_pairs_mut()
            .append_pair("audience", &self.audience)
            .append_pair("response_type", "token")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.callback_url);

        Ok(url)
    }
}

/// Transport limits applied to every route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub http: HttpConfig,

    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let port: u16 = match lookup("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = required("DATABASE_URL")?;

        let app_env = AppEnv::parse(&lookup("APP_ENV").unwrap_or_default());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let defaults = HttpConfig::default();
        let request_timeout = Duration::from_secs(seconds(
            &lookup,
            "HTTP_REQUEST_TIMEOUT_SECONDS",
            defaults.request_timeout.as_secs(),
        )?);
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid("HTTP_REQUEST_TIMEOUT_SECONDS"));
        }
        let body_limit_bytes = match lookup("HTTP_BODY_LIMIT_BYTES") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"))?,
            None => defaults.body_limit_bytes,
        };

        let domain = required("AUTH_DOMAIN")?;
        let audience = required("AUTH_AUDIENCE")?;

        // Auth0-style issuers carry a trailing slash
        let issuer = lookup("AUTH_ISSUER")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| format!("https://{}/", domain));

        let algorithms = match lookup("AUTH_ALGORITHMS") {
            Some(raw) => parse_algorithms(&raw)?,
            None => vec![Algorithm::RS256],
        };

        let jwks_url = lookup("AUTH_JWKS_URL")
            .unwrap_or_else(|| format!("https://{}/.well-known/jwks.json", domain));
        let jwks_url = Url::parse(&jwks_url).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?;

        let jwks_inline = match lookup("AUTH_JWKS_JSON").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                serde_json::from_str::<JwkSet>(&raw)
                    .map_err(|_| ConfigError::Invalid("AUTH_JWKS_JSON"))?,
            ),
            None => None,
        };

        let jwks_cache_ttl = Duration::from_secs(seconds(&lookup, "JWKS_CACHE_TTL_SECONDS", 300)?);
        let jwks_fetch_timeout =
            Duration::from_secs(seconds(&lookup, "JWKS_FETCH_TIMEOUT_SECONDS", 5)?);
        if jwks_fetch_timeout.is_zero() {
            return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_SECONDS"));
        }

        let leeway_seconds = seconds(&lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;

        let client_id = required("AUTH_CLIENT_ID")?;
        let callback_url = required("AUTH_CALLBACK_URL")?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            http: HttpConfig {
                request_timeout,
                body_limit_bytes,
            },
            auth: AuthConfig {
                domain,
                issuer,
                audience,
                algorithms,
                jwks_url,
                jwks_inline,
                jwks_cache_ttl,
                jwks_fetch_timeout,
                leeway_seconds,
                client_id,
                callback_url,
            },
        })
    }
}

fn seconds<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

// Only asymmetric algorithms: the verifier resolves public keys from a JWKS.
fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match Algorithm::from_str(s) {
            Ok(Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) | Err(_) => {
                Err(ConfigError::Invalid("AUTH_ALGORITHMS"))
            }
            Ok(alg) => Ok(alg),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
    }

    Ok(algorithms)
}
