/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / validation error / AuthError を統一的に変換
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

/// `{"success": false, "error": 404, "message": "resource not found"}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable entity")]
    Unprocessable,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Write paths report storage failures as 422 rather than 500.
    pub fn unprocessable(e: RepoError) -> Self {
        tracing::error!(error = %e, "write rejected by database");
        Self::Unprocessable
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(message) => {
                tracing::debug!(%message, "bad request");
                (StatusCode::BAD_REQUEST, None, "bad request".to_string())
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, None, "resource not found".into()),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                None,
                "method not allowed".into(),
            ),
            AppError::Unprocessable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                None,
                "unprocessable entity".into(),
            ),
            AppError::Auth(err) => (
                err.status(),
                Some(err.kind().code()),
                err.message().to_string(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = %e, "repository failure");
        match e {
            RepoError::Db(_) => AppError::Internal,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request(e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        // /actors/abc never names an existing row
        tracing::debug!(error = %e.body_text(), "path rejected");
        AppError::NotFound
    }
}

/// Router fallback: unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Router fallback: known route, wrong method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;
    use crate::services::auth::AuthErrorKind;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn auth_errors_carry_kind_code_and_message() {
        let (status, body) = render(AuthError::from(AuthErrorKind::TokenExpired).into()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": 401,
                "code": "token_expired",
                "message": "Token expired.",
            })
        );
    }

    #[tokio::test]
    async fn missing_permissions_claim_is_400() {
        let (status, body) =
            render(AuthError::from(AuthErrorKind::PermissionsNotFound).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], 400);
        assert_eq!(body["code"], "invalid_claims");
    }

    #[tokio::test]
    async fn plain_errors_use_fixed_messages() {
        let (status, body) = render(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": 404, "message": "resource not found"})
        );

        let (status, body) = render(AppError::bad_request("age must be >= 0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request");

        let (status, body) = render(AppError::Unprocessable).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "unprocessable entity");
    }
}
