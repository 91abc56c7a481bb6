//! Route-level permission gate.
//!
//! `protect(get(handler), &state, "get:actors")` wraps one route:
//! - `Authorization: Bearer <jwt>` を検証し、必要な permission を確認する
//! - 成功時は VerifiedClaims を extensions に入れて handler へ (extractors::Authorized で受け取る)
//! - 失敗時は handler を呼ばずに AuthError をそのまま返す (status は kind ごと)

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::PermissionGate;
use crate::state::AppState;

#[derive(Clone)]
struct Requirement {
    gate: Arc<PermissionGate>,
    permission: &'static str,
}

/// Require `permission` before any handler in `route` runs.
///
/// Uses `route_layer`, so unknown methods still fall through to 405
/// instead of being rejected as unauthorized.
pub fn protect(
    route: MethodRouter<AppState>,
    state: &AppState,
    permission: &'static str,
) -> MethodRouter<AppState> {
    let requirement = Requirement {
        gate: state.gate.clone(),
        permission,
    };

    route.route_layer(middleware::from_fn_with_state(
        requirement,
        permission_middleware,
    ))
}

async fn permission_middleware(
    State(requirement): State<Requirement>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Non-ASCII header bytes are treated like a malformed header, not a missing one.
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default().to_owned());

    let response = requirement
        .gate
        .guard(auth.as_deref(), requirement.permission, |claims| async move {
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(claims);
            next.run(req).await
        })
        .await?;

    Ok(response)
}
