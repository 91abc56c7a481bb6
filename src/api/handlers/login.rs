/*
 * Responsibility
 * - GET /auth: identity provider の authorize 画面へリダイレクト
 * - トークン発行はしない (外部 IdP の責務)
 */
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::state::AppState;

pub async fn login(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.login_url.to_string())],
    )
}
