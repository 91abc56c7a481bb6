use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::VerifiedClaims;
use crate::state::AppState;

/// Handler で、検証済み claims を受け取るための extractor
/// permission middleware が VerifiedClaims を request.extensions() に insert 済みである前提
/// 見つからない場合はルーティングの設定ミスなので 500 を返す
#[derive(Debug, Clone)]
pub struct Authorized(pub VerifiedClaims);

impl FromRequestParts<AppState> for Authorized {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedClaims>()
            .cloned()
            .map(Authorized)
            .ok_or_else(|| {
                tracing::error!(uri = %parts.uri, "route reached without permission gate");
                AppError::Internal
            })
    }
}
