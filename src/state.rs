/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, gate: PermissionGate, login_url
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::PermissionGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub gate: Arc<PermissionGate>,
    pub login_url: Arc<str>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, gate: Arc<PermissionGate>, login_url: impl Into<Arc<str>>) -> Self {
        Self {
            db,
            gate,
            login_url: login_url.into(),
        }
    }
}
